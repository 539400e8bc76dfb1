//! CLI commands against a temporary data directory

use std::{fs, path::Path};

use clap::Parser;
use storefront_app::{cli, config::AppConfig, context::AppContext, errors::AppError};
use tempfile::{TempDir, tempdir};
use testresult::TestResult;

const CATALOG_JSON: &str = r#"[
    {"name": "Vasos Personalizados", "price": 15000.00, "off": 20, "description": "Vasos.", "image": "vasos.jpg"},
    {"id": 7, "name": "Cono de Helado Mágico", "price": 800.00, "off": 0, "description": "Cono.", "image": "cono.jpg"}
]"#;

struct Shop {
    dir: TempDir,
}

impl Shop {
    fn new() -> TestResult<Self> {
        let dir = tempdir()?;
        fs::write(dir.path().join("productos.json"), CATALOG_JSON)?;

        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    async fn run(&self, args: &[&str]) -> Result<String, AppError> {
        let catalog = self.path().join("productos.json");
        let data_dir = self.path().join("data");

        let mut argv = vec![
            "storefront-app".to_string(),
            "--catalog".to_string(),
            catalog.display().to_string(),
            "--data-dir".to_string(),
            data_dir.display().to_string(),
        ];
        argv.extend(args.iter().map(ToString::to_string));

        let config = AppConfig::try_parse_from(argv).map_err(std::io::Error::other)?;
        let context = AppContext::from_config(&config.store)?;

        let mut out = Vec::new();
        cli::run(config.command, &context, &mut out).await?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[tokio::test]
async fn catalog_lists_products() -> TestResult {
    let shop = Shop::new()?;

    let output = shop.run(&["catalog"]).await?;

    assert!(output.contains("vasos-personalizados"), "output: {output}");
    assert!(output.contains("$ 15.000,00"), "output: {output}");
    assert!(output.contains("20% OFF"), "output: {output}");

    Ok(())
}

#[tokio::test]
async fn missing_catalog_reports_fallback_message() -> TestResult {
    let shop = Shop::new()?;
    fs::remove_file(shop.path().join("productos.json"))?;

    let result = shop.run(&["catalog"]).await;

    assert_eq!(
        result.map_err(|error| error.to_string()),
        Err("Error de conexión al obtener los datos de los productos.".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn cart_persists_between_commands() -> TestResult {
    let shop = Shop::new()?;

    shop.run(&["cart", "add", "vasos-personalizados"]).await?;
    shop.run(&["cart", "add", "7"]).await?;
    shop.run(&["cart", "increment", "7"]).await?;

    let output = shop.run(&["cart", "show"]).await?;

    assert!(output.contains("Artículos: 3"), "output: {output}");
    assert!(output.contains("Total: $ 16.600,00"), "output: {output}");

    let output = shop.run(&["cart", "remove", "missing"]).await?;

    assert!(output.contains("no está en el carrito"), "output: {output}");

    Ok(())
}

#[tokio::test]
async fn unknown_product_cannot_be_added() -> TestResult {
    let shop = Shop::new()?;

    let result = shop.run(&["cart", "add", "taza"]).await;

    assert!(
        matches!(result, Err(AppError::UnknownProduct(_))),
        "expected UnknownProduct, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn checkout_clears_the_cart() -> TestResult {
    let shop = Shop::new()?;

    let empty = shop.run(&["checkout", "--phone", "1234"]).await;

    assert!(
        matches!(empty, Err(AppError::Checkout(_))),
        "expected checkout error, got {empty:?}"
    );

    shop.run(&["cart", "add", "7"]).await?;

    let output = shop.run(&["checkout", "--phone", "1234"]).await?;

    assert_eq!(
        output.trim(),
        "¡Datos enviados con éxito! Te contactaremos al 1234."
    );

    let output = shop.run(&["cart", "show"]).await?;

    assert!(output.contains("vacío"), "output: {output}");

    Ok(())
}

#[tokio::test]
async fn admin_crud_round() -> TestResult {
    let shop = Shop::new()?;

    let listed = shop.run(&["admin", "list"]).await?;

    assert!(listed.contains("Vasos Personalizados"), "output: {listed}");

    let created = shop
        .run(&["admin", "create", "--name", "Taza", "--price", "1200"])
        .await?;

    assert!(created.contains("id: 9"), "output: {created}");
    assert!(created.contains("imagen: default.jpg"), "output: {created}");

    let updated = shop
        .run(&["admin", "update", "9", "--off", "15"])
        .await?;

    assert!(updated.contains("descuento: 15%"), "output: {updated}");
    assert!(updated.contains("nombre: Taza"), "output: {updated}");

    let refused = shop.run(&["admin", "delete", "9"]).await;

    assert!(
        matches!(refused, Err(AppError::ConfirmationRequired(9))),
        "expected confirmation error, got {refused:?}"
    );

    shop.run(&["admin", "delete", "9", "--yes"]).await?;

    let missing = shop.run(&["admin", "show", "9"]).await;

    assert!(
        matches!(missing, Err(AppError::Admin(_))),
        "expected not found, got {missing:?}"
    );

    Ok(())
}
