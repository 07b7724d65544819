use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "data_2.xlsx";
pub const DEFAULT_OUTPUT_PATH: &str = "converted_data_2.xlsx";

/// Where one run reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_path: I, output_path: O) -> Self {
        Self { input_path: input_path.into(), output_path: output_path.into() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.input_path, PathBuf::from("data_2.xlsx"));
        assert_eq!(config.output_path, PathBuf::from("converted_data_2.xlsx"));
    }

    #[test]
    fn test_new() {
        let config = Config::new("in.ods", PathBuf::from("out/result.xlsx"));
        assert_eq!(config.input_path, PathBuf::from("in.ods"));
        assert_eq!(config.output_path, PathBuf::from("out/result.xlsx"));
    }
}
