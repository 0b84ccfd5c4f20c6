use anyhow::{bail, Context};
use parcelctl::{
    config::Settings,
    order::{Address, ReceiverDetails, ReceiverName, ShipmentDetails},
    FileSink, LabelSink, OrderRequest, RequestContext, ShippingApiClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parcelctl=info")),
        )
        .init();

    if let Err(error) = run().await {
        tracing::error!("{error:#}");
        std::process::exit(1);
    }
}

/// Authenticate, create an order, fetch its label and save it.
/// Any failure stops the flow right there.
async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    let credentials = settings.credentials.client_credentials();
    if credentials.is_empty() {
        bail!("set PARCEL_CREDENTIALS__CLIENT_ID and PARCEL_CREDENTIALS__CLIENT_SECRET");
    }

    let client = ShippingApiClient::with_config(credentials, &settings.api.client_config())
        .context("building API client")?;

    // Ctrl-C cancels whichever request is in flight.
    let ctx = RequestContext::background();
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            interrupt.cancel();
        }
    });

    client
        .authenticate(&ctx)
        .await
        .context("getting access token")?;

    let order_id = client
        .create_order(&ctx, &sample_order())
        .await
        .context("creating order")?;
    println!("Order created with ID: {order_id}");

    let label = client
        .get_item_label(&ctx, &order_id)
        .await
        .context("getting item label")?;
    println!("Label received, size: {} bytes", label.len());

    let sink = FileSink::new(&settings.label.path);
    sink.write_label(&order_id, &label)
        .await
        .with_context(|| format!("saving label to {}", sink.path().display()))?;

    Ok(())
}

/// A small domestic parcel, enough to get a label out of the sandbox.
fn sample_order() -> OrderRequest {
    OrderRequest::new(
        "GPP",
        ReceiverDetails::new(
            ReceiverName::new("John", "Doe"),
            Address::new("Sample Street", "123", "12345", "Sample City", "DE"),
        ),
        ShipmentDetails::new(1000, 20, 15, 10),
    )
}
