use crate::error::{LaunchError, Result};
use std::fs;
use std::path::Path;

/// Minimal line-preserving editor for `erl.ini`.
///
/// The file's key names are case-sensitive, so lookups here are exact-match;
/// a case-folding config parser would corrupt the file. Editing replaces the
/// value of an existing key in an existing section only. Every other line,
/// including comments, blank lines, and unrelated keys, is written back
/// unchanged. Missing sections or keys are a fatal configuration error, not
/// an invitation to create them.
#[derive(Debug)]
pub struct ErlIni {
    lines: Vec<String>,
}

impl ErlIni {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LaunchError::ConfigRewrite(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(Self::from_str(&contents))
    }

    pub fn from_str(contents: &str) -> Self {
        Self {
            lines: contents.lines().map(str::to_string).collect(),
        }
    }

    /// Replace the value of `key` inside `[section]`. Exact-case match on
    /// both the section and the key.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        let header = format!("[{section}]");
        let mut in_section = false;

        for line in &mut self.lines {
            let trimmed = line.trim();
            if trimmed.starts_with('[') {
                in_section = trimmed == header;
                continue;
            }
            if !in_section {
                continue;
            }
            if let Some((lhs, _)) = line.split_once('=') {
                if lhs.trim() == key {
                    *line = format!("{lhs}={value}");
                    return Ok(());
                }
            }
        }

        if self.lines.iter().any(|l| l.trim() == header) {
            Err(LaunchError::ConfigRewrite(format!(
                "Key '{key}' not found in section [{section}]"
            )))
        } else {
            Err(LaunchError::ConfigRewrite(format!(
                "Section [{section}] not found"
            )))
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        fs::write(path, contents).map_err(|e| {
            LaunchError::ConfigRewrite(format!("Failed to write {}: {e}", path.display()))
        })
    }

    pub fn to_contents(&self) -> String {
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[erlang]
Bindir=C:\\\\old\\\\erts-13.0\\\\bin
Progname=erl
Rootdir=C:\\\\old

[other]
Foo=bar
";

    #[test]
    fn test_set_updates_only_target_keys() {
        let mut ini = ErlIni::from_str(SAMPLE);
        ini.set("erlang", "Bindir", "C:\\\\new\\\\erts-14.2\\\\bin")
            .unwrap();
        ini.set("erlang", "Rootdir", "C:\\\\new").unwrap();

        let out = ini.to_contents();
        assert!(out.contains("Bindir=C:\\\\new\\\\erts-14.2\\\\bin"));
        assert!(out.contains("Rootdir=C:\\\\new"));
        assert!(out.contains("Progname=erl"));
        assert!(out.contains("Foo=bar"));
    }

    #[test]
    fn test_unrelated_key_preserved_verbatim() {
        let mut ini = ErlIni::from_str("[erlang]\nBindir=x\nRootdir=y\nFoo=bar\n");
        ini.set("erlang", "Bindir", "new-bin").unwrap();
        ini.set("erlang", "Rootdir", "new-root").unwrap();
        assert_eq!(
            ini.to_contents(),
            "[erlang]\nBindir=new-bin\nRootdir=new-root\nFoo=bar\n"
        );
    }

    #[test]
    fn test_key_lookup_is_case_sensitive() {
        let mut ini = ErlIni::from_str("[erlang]\nBindir=x\n");
        let err = ini.set("erlang", "bindir", "y").unwrap_err();
        match err {
            LaunchError::ConfigRewrite(msg) => assert!(msg.contains("bindir")),
            other => panic!("unexpected error variant: {other:?}"),
        }
        // The original key is untouched.
        assert!(ini.to_contents().contains("Bindir=x"));
    }

    #[test]
    fn test_missing_section_is_fatal() {
        let mut ini = ErlIni::from_str("[other]\nBindir=x\n");
        let err = ini.set("erlang", "Bindir", "y").unwrap_err();
        match err {
            LaunchError::ConfigRewrite(msg) => assert!(msg.contains("[erlang]")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn test_set_does_not_touch_same_key_in_other_section() {
        let mut ini = ErlIni::from_str("[other]\nBindir=keep\n[erlang]\nBindir=x\n");
        ini.set("erlang", "Bindir", "new").unwrap();
        let out = ini.to_contents();
        assert!(out.contains("Bindir=keep"));
        assert!(out.contains("Bindir=new"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("erl.ini");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut ini = ErlIni::read(&path).unwrap();
        ini.set("erlang", "Rootdir", "D:\\\\erl").unwrap();
        ini.write(&path).unwrap();

        let reread = std::fs::read_to_string(&path).unwrap();
        assert!(reread.contains("Rootdir=D:\\\\erl"));
        assert!(reread.contains("[other]"));
    }

    #[test]
    fn test_read_missing_file_is_config_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = ErlIni::read(&temp_dir.path().join("erl.ini")).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigRewrite(_)));
    }
}
