//! Transaction Add
//!
//! This example drives the "add transaction" screen the way a UI would.
//!
//! Key concepts:
//! - Components expose callbacks and an observable state
//! - Validation errors for every field are reported together
//! - Repository failures surface in state and can be retried
//! - A successful submission closes the screen through a one-shot event
//!
//! Run with: RUST_LOG=debug cargo run --example transaction_add

use monkeybusiness::components::{
    TransactionAddComponent, TransactionAddComponentImpl, TransactionAddDependencies,
};
use monkeybusiness::feature::{FeatureConfig, FeatureFactory};
use monkeybusiness::finance::{
    Currency, InMemoryTransactionsRepository, RepositoryError, TransactionType,
    TransactionsRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG: &str = r#"
history_capacity = 16
event_capacity = 4
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "monkeybusiness=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Transaction Add ===\n");

    let factory = FeatureFactory::with_config(FeatureConfig::from_toml_str(CONFIG)?);
    let repository = Arc::new(
        InMemoryTransactionsRepository::new().with_latency(Duration::from_millis(200)),
    );
    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();

    let component = TransactionAddComponentImpl::new(
        TransactionAddDependencies {
            transactions_repository: repository.clone(),
        },
        &factory,
        move || {
            let _ = closed_tx.send(());
        },
    )?;
    let mut state = component.state();

    // Empty form: both fields are flagged at once
    component.on_add_clicked();
    let snapshot = state
        .wait_for(|s| s.name_error.is_some() || s.amount_error.is_some())
        .await?
        .clone();
    println!(
        "Empty form -> name: {:?}, amount: {:?}",
        snapshot.name_error, snapshot.amount_error
    );

    component.on_name_text_changed("Groceries");
    component.on_amount_text_changed("42.50");
    component.on_transaction_type_selected(TransactionType::Credit);
    component.on_currency_selected(Currency::EUR);

    // Offline: the error lands in state and the screen stays open
    repository.set_failure(Some(RepositoryError::Unavailable("no network".to_string())));
    component.on_add_clicked();
    let snapshot = state.wait_for(|s| s.error.is_some()).await?.clone();
    println!("Offline -> {}", snapshot.error.unwrap_or_default());

    // Back online: retry succeeds and the screen asks to be closed
    repository.set_failure(None);
    component.on_add_clicked();
    closed_rx.recv().await;
    println!("Screen closed after successful submission");

    for transaction in repository.transactions().await? {
        println!("Stored: {} {}", transaction.name, transaction.money_amount);
    }

    println!("\n=== Complete ===");
    Ok(())
}
