//! Secrets loading.
//!
//! The loader never touches the process environment. It builds an [`Environment`]
//! snapshot that the prober reads credentials from.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error(".env file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Read-only key/value snapshot handed to the prober.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Load `path` on top of the current process values of `allow_list`.
    ///
    /// File entries override process values; a key repeated in the file keeps its last value.
    /// Lines that fail to parse are logged and skipped. Only an unreadable file is an error.
    pub fn load<I, S>(path: &Path, allow_list: I) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !path.is_file() {
            return Err(EnvError::NotFound(path.to_path_buf()));
        }

        let mut vars = HashMap::new();
        for name in allow_list {
            let name = name.as_ref();
            if let Ok(value) = env::var(name) {
                vars.insert(name.to_string(), value);
            }
        }

        let read_err = |source| EnvError::Read {
            path: path.to_path_buf(),
            source,
        };
        let mut from_file = 0usize;
        let mut skipped = 0usize;
        for item in dotenvy::from_path_iter(path).map_err(read_err)? {
            match item {
                Ok((key, value)) => {
                    vars.insert(key, value);
                    from_file += 1;
                }
                Err(error @ dotenvy::Error::LineParse(..)) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unparsable line");
                    skipped += 1;
                }
                Err(other) => return Err(read_err(other)),
            }
        }
        tracing::debug!(
            path = %path.display(),
            entries = from_file,
            skipped,
            "loaded secrets file"
        );

        Ok(Self { vars })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `name`, treating empty strings as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_env(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(".env");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let err = Environment::load(&path, ["OPENAI_API_KEY"]).unwrap_err();
        assert!(matches!(err, EnvError::NotFound(p) if p == path));
    }

    #[test]
    fn later_entries_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(&dir, "KC_TEST_DUP=first\nKC_TEST_DUP=second\n");
        let env = Environment::load(&path, Vec::<String>::new()).unwrap();
        assert_eq!(env.get("KC_TEST_DUP"), Some("second"));
    }

    #[test]
    fn file_overrides_process_value() {
        std::env::set_var("KC_TEST_OVERRIDE_KEY", "from-process");
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(&dir, "KC_TEST_OVERRIDE_KEY=from-file\n");
        let env = Environment::load(&path, ["KC_TEST_OVERRIDE_KEY"]).unwrap();
        assert_eq!(env.get("KC_TEST_OVERRIDE_KEY"), Some("from-file"));
        // The process environment itself is left alone.
        assert_eq!(
            std::env::var("KC_TEST_OVERRIDE_KEY").unwrap(),
            "from-process"
        );
    }

    #[test]
    fn allow_listed_process_values_are_carried() {
        std::env::set_var("KC_TEST_PROCESS_ONLY", "kept");
        std::env::set_var("KC_TEST_NOT_LISTED", "dropped");
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(&dir, "# nothing here\n");
        let env = Environment::load(&path, ["KC_TEST_PROCESS_ONLY"]).unwrap();
        assert_eq!(env.get("KC_TEST_PROCESS_ONLY"), Some("kept"));
        assert_eq!(env.get("KC_TEST_NOT_LISTED"), None);
    }

    #[test]
    fn quoted_values_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(
            &dir,
            "# secrets\nKC_TEST_QUOTED=\"sk-abc 123\"\n\nKC_TEST_PLAIN=plain\n",
        );
        let env = Environment::load(&path, Vec::<String>::new()).unwrap();
        assert_eq!(env.get("KC_TEST_QUOTED"), Some("sk-abc 123"));
        assert_eq!(env.get("KC_TEST_PLAIN"), Some("plain"));
    }

    #[test]
    fn empty_values_read_as_absent() {
        let env = Environment::from_pairs([("OPENAI_API_KEY", "")]);
        assert_eq!(env.get("OPENAI_API_KEY"), None);
        assert_eq!(env.get("GEMINI_API_KEY"), None);
    }

    #[test]
    fn unparsable_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(
            &dir,
            "KC_TEST_BEFORE=sk-real\nsome stray note\nKC_TEST_AFTER=g\n",
        );
        let env = Environment::load(&path, Vec::<String>::new()).unwrap();
        assert_eq!(env.get("KC_TEST_BEFORE"), Some("sk-real"));
        assert_eq!(env.get("KC_TEST_AFTER"), Some("g"));
        assert_eq!(env.get("some stray note"), None);
    }
}
