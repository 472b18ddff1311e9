/*!
 * Proofreading round trip.
 *
 * - `prompt`: numbered request construction
 * - `mapper`: result table back to block indices
 * - `cache`: last result, keyed by input hash
 *
 * The service itself sits behind the `Proofreader` trait in `providers`.
 */

use log::{error, info};

use crate::providers::Proofreader;
use crate::script::RenderedScript;

pub mod cache;
pub mod mapper;
pub mod prompt;

pub use cache::ProofreadCache;
pub use mapper::{Finding, ProofreadReport, map_response};
pub use prompt::PromptTemplate;

/// Proofread the blocks of a first render pass.
///
/// The service is only called when `cache` holds nothing for `input_text`.
/// A service failure becomes the report's display text and highlights
/// nothing, so the caller can still render the script.
pub async fn proofread_script(
    proofreader: &dyn Proofreader,
    cache: &ProofreadCache,
    template: &PromptTemplate,
    input_text: &str,
    first_pass: &RenderedScript,
) -> ProofreadReport {
    if first_pass.ai_data.is_empty() {
        return ProofreadReport::default();
    }

    let response = match cache.get(input_text) {
        Some(cached) => cached,
        None => {
            let prompt = template.render(&first_pass.ai_data);
            info!("Sending {} blocks to {} for proofreading", first_pass.ai_data.len(), proofreader.name());
            match proofreader.proofread(&prompt).await {
                Ok(response) => {
                    cache.store(input_text, &response);
                    response
                }
                Err(e) => {
                    error!("Proofreading failed: {}", e);
                    return ProofreadReport {
                        display_text: format!("Proofreading service error: {}", e),
                        ..Default::default()
                    };
                }
            }
        }
    };

    map_response(&response, &first_pass.start_times)
}
