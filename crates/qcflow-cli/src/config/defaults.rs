use qcflow::core::io::gaussian::DEFAULT_ERROR_SCAN_WINDOW;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub base_path: PathBuf,
    pub error_scan_window: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            error_scan_window: DEFAULT_ERROR_SCAN_WINDOW,
        }
    }
}
