use super::{LoadError, LoadedText};
use arboard::Clipboard;

pub fn load() -> Result<LoadedText, LoadError> {
    let mut clipboard = Clipboard::new().map_err(|err| LoadError::Clipboard(err.to_string()))?;
    let text = clipboard
        .get_text()
        .map_err(|err| LoadError::Clipboard(err.to_string()))?;

    if text.trim().is_empty() {
        return Err(LoadError::Clipboard("clipboard is empty".to_string()));
    }

    Ok(LoadedText {
        text,
        source: "clipboard".to_string(),
    })
}
