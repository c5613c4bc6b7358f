//! Request data extractors with structured rejections.

mod enhanced_json;
mod enhanced_path;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::validated_json::ValidateJson;
