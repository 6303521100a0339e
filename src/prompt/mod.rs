// Declare submodules
mod common;
mod summaries;
mod thread;

pub use common::NO_LABELS;
pub use summaries::{abstract_prompt, linkedin_post_prompt};
pub use thread::twitter_thread_prompt;

use crate::Format;

/// Build the upstream prompt for the requested format.
pub fn for_format(format: Format, content: &str) -> String {
    match format {
        Format::Abstract => abstract_prompt(content),
        Format::LinkedinPost => linkedin_post_prompt(content),
        Format::TwitterThread => twitter_thread_prompt(content),
    }
}
