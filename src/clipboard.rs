//! System clipboard access.
//!
//! Thin wrapper over `arboard` with the app's policy baked in: copying
//! blank content is refused (it would silently clobber whatever the user
//! had), and read failures degrade to an empty string.

use arboard::Clipboard;
use tracing::{debug, warn};

use crate::error::{ClimptError, Result};

/// Copy `content` to the system clipboard, overwriting what was there.
///
/// Empty or whitespace-only content is rejected.
pub fn copy_text(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        warn!("Refusing to copy empty content to clipboard");
        return Err(ClimptError::Clipboard(
            "nothing to copy: content is empty".to_string(),
        ));
    }

    let mut clipboard =
        Clipboard::new().map_err(|e| ClimptError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(content.to_string())
        .map_err(|e| ClimptError::Clipboard(e.to_string()))?;

    debug!(chars = content.len(), "Copied content to clipboard");
    Ok(())
}

/// Current clipboard text, or an empty string when unavailable.
pub fn get_text() -> String {
    match Clipboard::new().and_then(|mut c| c.get_text()) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to read clipboard");
            String::new()
        }
    }
}

/// Clear the clipboard.
pub fn clear() -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| ClimptError::Clipboard(e.to_string()))?;
    clipboard
        .clear()
        .map_err(|e| ClimptError::Clipboard(e.to_string()))?;
    debug!("Clipboard cleared");
    Ok(())
}

/// Whether the clipboard is empty or whitespace-only.
pub fn is_empty() -> bool {
    get_text().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_rejects_empty_content() {
        assert!(copy_text("").is_err());
        assert!(copy_text("   \n\t").is_err());
    }

    // These touch the real system clipboard; run with --features system-tests.
    #[cfg(feature = "system-tests")]
    mod system {
        use super::*;

        #[test]
        fn copy_then_read_round_trips() {
            copy_text("climpt clipboard test").unwrap();
            assert_eq!(get_text(), "climpt clipboard test");
        }

        #[test]
        fn clear_empties_clipboard() {
            copy_text("to be cleared").unwrap();
            clear().unwrap();
            assert!(is_empty());
        }
    }
}
