use crate::core::hosting::UrlCorrector;

/// Per-directory inputs shared by every extraction in that directory.
pub struct ExtractContext<'a> {
    pub corrector: &'a UrlCorrector,
    /// URL correction configured for the directory being scanned.
    pub correction: &'a str,
    /// Allow bare `MANIFEST.MF` archives to be classified as mods.
    pub accept_legacy: bool,
}
