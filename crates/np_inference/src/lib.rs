pub mod enhancement;
pub mod models;
pub mod prompt;
pub mod speech;

pub use enhancement::{validate_enhancement, EnhancementAdapter};
pub use models::{create_enhancement_providers, create_speech_providers};
pub use speech::{normalize_for_speech, SpeechAdapter, MAX_SPEECH_CHARS};

pub mod prelude {
    pub use super::models::{create_enhancement_providers, create_speech_providers};
    pub use super::{EnhancementAdapter, SpeechAdapter};
    pub use np_core::{ArticleEnhancement, AudioClip, Error, Result};
}
