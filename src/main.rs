use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use inventory_client::{
    load_config, CollectionController, CollectionState, FieldChange, FormController, FormState,
    Gender, Product, ProductGateway, ToastChannel,
};

#[derive(Parser)]
#[command(
    name = "inventory-client",
    about = "Inventory manager client: list, create, update, and delete products"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all products
    List,
    /// Show a single product
    Get { sku: String },
    /// Create a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        size: String,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Update a product (unspecified fields keep their current value)
    Update {
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete one or more products
    Delete {
        #[arg(required = true)]
        skus: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;
    inventory_client::config::init_tracing(&cfg.log_level);

    let gateway = ProductGateway::new(cfg.api_base_url.clone(), cfg.request_timeout())?;
    let toasts = ToastChannel::new(cfg.toast_duration());
    let policy = cfg.validation_policy();

    match Cli::parse().command {
        Command::List => {
            let collection = CollectionController::new(gateway, toasts);
            collection.refresh().await;
            match collection.state() {
                CollectionState::Loaded { items, .. } => print_rows(&items),
                CollectionState::LoadFailed(err) => bail!("failed to load products: {}", err),
                CollectionState::Loading => unreachable!("refresh always settles"),
            }
        }
        Command::Get { sku } => {
            let product = gateway
                .get(&sku)
                .await
                .with_context(|| format!("could not fetch product {}", sku))?;
            print_rows(std::slice::from_ref(&product));
        }
        Command::Add {
            name,
            quantity,
            price,
            size,
            gender,
            brand,
            category,
        } => {
            let form = FormController::for_create(gateway, toasts.clone(), policy);
            apply_fields(
                &form,
                Some(name),
                Some(quantity),
                Some(price),
                Some(size),
                gender,
                brand,
                category,
            )?;
            form.submit().await;
            finish_form(&form, &toasts)?;
        }
        Command::Update {
            sku,
            name,
            quantity,
            price,
            size,
            gender,
            brand,
            category,
        } => {
            let form = FormController::for_update(gateway, toasts.clone(), policy, sku);
            form.load().await;
            if let FormState::LoadFailed(err) = form.state() {
                bail!("could not load product: {}", err.user_message());
            }
            apply_fields(&form, name, quantity, price, size, gender, brand, category)?;
            form.submit().await;
            finish_form(&form, &toasts)?;
        }
        Command::Delete { skus } => {
            let collection = CollectionController::new(gateway, toasts.clone());
            collection.refresh().await;
            if let CollectionState::LoadFailed(err) = collection.state() {
                bail!("failed to load products: {}", err);
            }
            for sku in &skus {
                collection.toggle_row(sku);
            }
            let selected = collection
                .state()
                .selection()
                .map(|selection| selection.len())
                .unwrap_or(0);
            if selected != skus.len() {
                bail!("some of the given SKUs are not in the collection");
            }
            collection.delete_selected().await;
            if let Some(toast) = toasts.current() {
                println!("{}", toast.message);
            }
            if let CollectionState::LoadFailed(err) = collection.state() {
                bail!("refresh after delete failed: {}", err);
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_fields(
    form: &FormController,
    name: Option<String>,
    quantity: Option<String>,
    price: Option<String>,
    size: Option<String>,
    gender: Option<String>,
    brand: Option<String>,
    category: Option<String>,
) -> anyhow::Result<()> {
    if let Some(value) = name {
        form.handle_change(FieldChange::Name(value));
    }
    if let Some(value) = brand {
        form.handle_change(FieldChange::Brand(value));
    }
    // Gender before size: choosing a gender resets the size field.
    if let Some(value) = gender {
        let gender = Gender::from_str(&value)
            .map_err(|_| anyhow::anyhow!("gender must be 'male' or 'female'"))?;
        form.handle_change(FieldChange::Gender(Some(gender)));
    }
    if let Some(value) = size {
        form.handle_change(FieldChange::Size(value));
    }
    if let Some(value) = category {
        form.handle_change(FieldChange::Category(value));
    }
    if let Some(value) = quantity {
        form.handle_change(FieldChange::Quantity(value));
    }
    if let Some(value) = price {
        form.handle_change(FieldChange::NormalPrice(value));
    }
    Ok(())
}

fn finish_form(form: &FormController, toasts: &ToastChannel) -> anyhow::Result<()> {
    if let Some(error) = form.state().error() {
        bail!("{}", error);
    }
    if let Some(toast) = toasts.current() {
        println!("{}", toast.message);
    }
    Ok(())
}

fn print_rows(products: &[Product]) {
    println!(
        "{:<10} {:<12} {:<24} {:<8} {:<8} {:>6} {:>8} {:>10}  {}",
        "SKU", "Brand", "Name", "Category", "Gender", "Size", "Qty", "Price", "Entry date"
    );
    for product in products {
        println!(
            "{:<10} {:<12} {:<24} {:<8} {:<8} {:>6} {:>8} {:>10}  {}",
            product.sku,
            product.brand.as_deref().unwrap_or("-"),
            product.name,
            product
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            product
                .gender
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_string()),
            product.size,
            product.quantity,
            product.normal_price,
            product
                .entry_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("Rows: {}", products.len());
}
