use std::path::{Path, PathBuf};
use std::sync::Arc;

use snapmark_core::{RecordingEvents, SnapshotOptions};
use snapmark_store::SnapshotStore;
use tempfile::TempDir;

/// A snapshot file with two tests: one bare entry and two named entries
#[allow(dead_code)]
pub const PARSER_SNAPSHOT: &str = "# parser.test.md

Snapshots for `parser.test.md`.

## `parses empty input`

```
[]
```

## `parses list`

### `tokens`

```json
[\"a\", \"b\"]
```

### `ast`

```
List(a, b)
```
";

/// Temp project directory holding a test source path
#[allow(dead_code)]
pub struct Fixture {
    pub dir: TempDir,
    pub test_file: PathBuf,
    pub snapshot: PathBuf,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let test_file = dir.path().join("parser.rs");
        let snapshot = dir.path().join("parser.test.md");
        Self {
            dir,
            test_file,
            snapshot,
        }
    }

    pub fn with_snapshot(content: &str) -> Self {
        let fixture = Self::new();
        fixture.write(&fixture.snapshot, content);
        fixture
    }

    pub fn write(&self, path: &Path, content: &str) {
        std::fs::write(path, content).expect("Failed to write fixture file");
    }

    pub fn read_snapshot(&self) -> String {
        std::fs::read_to_string(&self.snapshot).expect("Failed to read snapshot")
    }

    pub fn store(&self, options: SnapshotOptions) -> (Arc<SnapshotStore>, Arc<RecordingEvents>) {
        let events = Arc::new(RecordingEvents::new());
        let store = SnapshotStore::new(options)
            .with_events(events.clone())
            .with_root(self.dir.path());
        (Arc::new(store), events)
    }
}
