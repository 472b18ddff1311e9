/*!
 * # Syncraft - narration script builder
 *
 * A Rust library that turns caption data exported from a video editor into a
 * narration script in the studio layout: full-width digits and letters,
 * `Ｎ` speaker tags, end-time annotations and hour markers.
 *
 * ## Features
 *
 * - Parse pasted timestamp + text blocks, in half- or full-width notation
 * - Import sequence XML, decoding caption text stored as base64 payloads
 * - Drop-frame timecode conversion for 29.97 fps timelines
 * - Optional proofreading through an LLM service, with flagged blocks
 *   highlighted in the rendered script
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Drop-frame timecode conversion
 * - `caption_decoder`: Caption payload decoding
 * - `project_file`: Sequence XML import
 * - `script`: Script conversion:
 *   - `script::parser`: Block parsing from pasted text
 *   - `script::renderer`: Narration layout rendering
 *   - `script::width`: Half-width / full-width mapping
 * - `proofread`: Proofreading round trip (prompt, result mapping, cache)
 * - `providers`: Client implementations for proofreading services
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption_decoder;
pub mod errors;
pub mod file_utils;
pub mod project_file;
pub mod proofread;
pub mod providers;
pub mod script;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_decoder::CaptionDecoder;
pub use errors::{AppError, ProjectFileError, ProviderError, ScriptError};
pub use project_file::{ProjectFile, ProjectFileParser};
pub use script::{HighlightSet, RenderOptions, RenderedScript, ScriptRenderer, TextBlock, convert_script};
pub use timecode::{TimeRange, Timecode, frames_to_timecode};
