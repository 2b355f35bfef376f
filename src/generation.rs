// One generation round trip: proxy call, progress ticks, extraction

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::ProxyClient;
use crate::events::AppEvent;
use crate::extract::extract_code;
use crate::models::{GenerationRequest, ProgressConfig};
use crate::progress::ProgressTicker;

/// Runs the request to completion, reporting over `tx`. The progress ticker
/// is finished on both outcomes.
pub async fn run_generation(
    client: &ProxyClient,
    request: &GenerationRequest,
    tx: &UnboundedSender<AppEvent>,
    progress: ProgressConfig,
) {
    let ticker = ProgressTicker::start(tx.clone(), progress);

    tracing::info!(framework = %request.framework, "requesting generation");
    let result = client.generate(request).await;

    ticker.finish();

    let event = match result {
        Ok(response) => AppEvent::GenerationSucceeded(extract_code(&response.code)),
        Err(e) => AppEvent::GenerationFailed(format!("{e:#}")),
    };
    let _ = tx.send(event);
}

pub fn spawn_generation(
    client: &ProxyClient,
    request: GenerationRequest,
    tx: &UnboundedSender<AppEvent>,
    progress: ProgressConfig,
) -> JoinHandle<()> {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move { run_generation(&client, &request, &tx, progress).await })
}
