#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Keys drive playback and settings
    Reading,
    /// Keys are typed into the command deck
    Command,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appmode_is_copy_and_comparable() {
        let mode = AppMode::Command;
        let copy = mode;
        assert_eq!(mode, copy);
        assert_ne!(AppMode::Reading, AppMode::Quit);
    }
}
