use crate::error::DatasetError;
use crate::locale::NumberFormat;
use configuration::{ExportSettings, SourceSettings};
use core_types::Product;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes `products` to a file, using the source file's conventions.
pub fn export_products(
    path: &Path,
    products: &[Product],
    source: &SourceSettings,
    export: &ExportSettings,
) -> Result<(), DatasetError> {
    let file = File::create(path)?;
    write_products(file, products, source, export)?;
    info!(path = %path.display(), products = products.len(), "Products exported.");
    Ok(())
}

/// Writes a header row and one row per product.
pub fn write_products<W: Write>(
    writer: W,
    products: &[Product],
    source: &SourceSettings,
    export: &ExportSettings,
) -> Result<(), DatasetError> {
    let format = NumberFormat::from_settings(source);
    let render = |value: Decimal| match export.decimal_places {
        Some(dp) => {
            format.format(value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        }
        None => format.format(value),
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(source.delimiter as u8)
        .from_writer(writer);

    let columns = &source.columns;
    csv_writer.write_record([
        &columns.description,
        &columns.cost,
        &columns.price,
        &columns.profit,
        &columns.margin,
    ])?;

    for product in products {
        csv_writer.write_record([
            product.description().unwrap_or_default().to_string(),
            render(product.cost),
            render(product.price),
            render(product.profit),
            render(product.margin_pct),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_products;
    use rust_decimal_macros::dec;

    fn products() -> Vec<Product> {
        vec![
            Product {
                description: Some("Salamin Primavera".to_string()),
                cost: dec!(100),
                price: dec!(150),
                profit: dec!(50),
                margin_pct: dec!(33.3333),
            },
            Product {
                description: None,
                cost: dec!(50),
                price: dec!(110),
                profit: dec!(60),
                margin_pct: dec!(54.5),
            },
        ]
    }

    fn rounded(dp: u32) -> ExportSettings {
        ExportSettings {
            decimal_places: Some(dp),
            ..ExportSettings::default()
        }
    }

    fn written(products: &[Product], export: &ExportSettings) -> String {
        let mut buf = Vec::new();
        write_products(&mut buf, products, &SourceSettings::default(), export).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_semicolons_and_decimal_commas() {
        let text = written(&products(), &ExportSettings::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Desc;Costo;Precio;Ganancia_$;Margen_%");
        assert_eq!(lines[1], "Salamin Primavera;100;150;50;33,3333");
        assert_eq!(lines[2], ";50;110;60;54,5");
    }

    #[test]
    fn default_export_reads_back_identically() {
        let mut fine = products();
        fine.push(Product {
            description: Some("A".to_string()),
            cost: dec!(0.125),
            price: dec!(2.675),
            profit: dec!(2.55),
            margin_pct: dec!(95.327),
        });

        let text = written(&fine, &ExportSettings::default());
        assert!(text.contains("A;0,125;2,675;2,55;95,327"));

        let outcome = read_products(text.as_bytes(), &SourceSettings::default()).unwrap();
        assert_eq!(outcome.products, fine);
    }

    #[test]
    fn optional_rounding_sends_midpoints_away_from_zero() {
        let product = Product {
            description: Some("A".to_string()),
            cost: dec!(0.125),
            price: dec!(2.675),
            profit: dec!(-2.555),
            margin_pct: dec!(33.3333),
        };
        let text = written(&[product], &rounded(2));
        assert_eq!(text.lines().nth(1), Some("A;0,13;2,68;-2,56;33,33"));
    }
}
