use crate::error::Error;
use crate::model::Outcome;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const HEADER: &str = "Test započet:\n\n";
pub const FINISHED: &str = "Test završen. Provjerite log fajl:";
pub const SEPARATOR_WIDTH: usize = 50;

/// Append-only response log shared by all workers.
///
/// Nothing is held open between writes: every record opens the file in
/// append mode, writes the whole record in one call and closes it again.
#[derive(Clone, Debug)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Truncates `path` and writes the start marker.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        tokio::fs::write(&path, HEADER)
            .await
            .map_err(|source| Error::CreateLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path })
    }

    /// Line printed once every worker has stopped.
    pub fn finished_message(path: &Path) -> String {
        format!("{FINISHED} {}", path.display())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, outcome: &Outcome) -> Result<(), Error> {
        let record = format_record(outcome);
        self.write(record.as_bytes())
            .await
            .map_err(|source| Error::AppendLog {
                path: self.path.clone(),
                source,
            })
    }

    async fn write(&self, buf: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(buf).await?;
        // tokio hands the write to a blocking thread; flush waits for it
        file.flush().await
    }
}

pub fn format_record(outcome: &Outcome) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    match outcome {
        Outcome::Response { status, body } => {
            format!("Status Code: {status}\nResponse: {body}\n{separator}\n")
        }
        Outcome::Error(message) => {
            format!("Status Code: Error\nResponse: {message}\n{separator}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_record() {
        let record = format_record(&Outcome::Response {
            status: 200,
            body: "[]".to_string(),
        });
        assert_eq!(
            record,
            format!("Status Code: 200\nResponse: []\n{}\n", "-".repeat(50))
        );
    }

    #[test]
    fn error_record() {
        let record = format_record(&Outcome::Error("connection refused".to_string()));
        let lines: Vec<_> = record.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Status Code: Error",
                "Response: connection refused",
                "--------------------------------------------------",
            ]
        );
    }

    #[test]
    fn empty_body_keeps_three_lines() {
        let record = format_record(&Outcome::Response {
            status: 204,
            body: String::new(),
        });
        assert_eq!(record.lines().count(), 3);
        assert!(record.lines().nth(1).is_some_and(|l| l == "Response: "));
    }

    #[test]
    fn finished_message_names_log() {
        let message = LogFile::finished_message(Path::new("responses.log"));
        assert_eq!(message, "Test završen. Provjerite log fajl: responses.log");
        assert!(HEADER.starts_with("Test započet:"));
    }

    #[tokio::test]
    async fn create_truncates_and_append_adds() {
        let path = std::env::temp_dir().join(format!("barrage-log-unit-{}.log", std::process::id()));
        tokio::fs::write(&path, "stale contents\n").await.unwrap();

        let log = LogFile::create(&path).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), HEADER);

        log.append(&Outcome::Error("boom".to_string())).await.unwrap();
        log.append(&Outcome::Response {
            status: 500,
            body: "oops".to_string(),
        })
        .await
        .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.starts_with(HEADER));
        assert_eq!(contents.matches("Status Code: ").count(), 2);
        assert!(contents.contains("Status Code: 500\nResponse: oops\n"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn create_fails_for_missing_directory() {
        let path = std::env::temp_dir()
            .join("barrage-no-such-dir")
            .join("nested")
            .join("responses.log");
        let err = LogFile::create(&path).await.unwrap_err();
        assert!(matches!(err, Error::CreateLog { .. }));
    }

    #[tokio::test]
    async fn append_fails_when_file_removed() {
        let path = std::env::temp_dir().join(format!("barrage-log-gone-{}.log", std::process::id()));
        let log = LogFile::create(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let err = log.append(&Outcome::Error("x".to_string())).await.unwrap_err();
        assert!(matches!(err, Error::AppendLog { .. }));
    }
}
