//! Admin Panel Example
//!
//! Serves the product resource with a handful of seeded categories, tags
//! and products. Set `PANEL_CONFIG` to a YAML file to override the
//! defaults, and `RUST_LOG` to tune logging.

use anyhow::Result;
use panel::prelude::*;
use panel::products::ProductInput;
use panel::products::resource::TAGS_PIVOT;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("panel=info,admin_panel=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("PANEL_CONFIG") {
        Ok(path) => PanelConfig::from_yaml_file(&path)?,
        Err(_) => PanelConfig::default(),
    };

    let stores = ProductStores::in_memory();
    seed(&stores).await?;

    let resource = ProductResource::new(&config.panel.currency);
    println!("🚀 Starting product panel");
    println!("\n🌐 Server running on http://{}", config.server.bind);
    println!("\n📚 Routes:");
    println!("    GET    {}/navigation", config.panel_path());
    println!("    GET    {}/products", config.panel_path());
    println!("    GET    {}/products/create", config.panel_path());
    println!("    GET    {}/products/{{record}}/edit", config.panel_path());
    println!("    GET    {}/products/schema/table", config.panel_path());

    ServerBuilder::new()
        .with_config(config.clone())
        .register(ProductDescriptor::new(
            resource,
            stores,
            config.pagination.clone(),
        ))
        .serve()
        .await
}

async fn seed(stores: &ProductStores) -> Result<()> {
    let mut categories = Vec::new();
    for name in ["Keyboards", "Mice", "Monitors"] {
        categories.push(stores.categories.create(Category::new(name)).await?);
    }

    let mut tags = Vec::new();
    for name in ["wireless", "ergonomic", "refurbished"] {
        tags.push(stores.tags.create(Tag::new(name)).await?);
    }

    let products = [
        ("Mechanical Keyboard", 12_999, ProductStatus::InStock, 0, "Hot-swappable switches."),
        ("Travel Mouse", 2_499, ProductStatus::SoldOut, 1, "Fits in any pocket."),
        ("Vertical Mouse", 4_950, ProductStatus::InStock, 1, "Neutral wrist angle."),
        ("27\" 4K Monitor", 39_900, ProductStatus::ComingSoon, 2, ""),
    ];

    let seeded = products.len();
    for (name, price, status, category, description) in products {
        let product = stores
            .products
            .create(Product::new(ProductInput {
                name: name.to_string(),
                price,
                status,
                category_id: Some(categories[category].id),
                description: description.to_string(),
            }))
            .await?;

        if name.contains("Mouse") {
            for tag in &tags[..2] {
                stores.pivots.attach(TAGS_PIVOT, product.id, tag.id).await?;
            }
        }
    }

    tracing::info!(
        categories = categories.len(),
        tags = tags.len(),
        products = seeded,
        "seeded demo data"
    );
    Ok(())
}
