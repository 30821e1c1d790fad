// Wire format of the lifecycle event stream (one JSON object per line)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::{TestError, TestState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WireEvent {
    RunStart,

    /// Declare a scope; a missing parent means the root
    Suite {
        id: String,
        title: String,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        file: Option<PathBuf>,
    },

    /// Declare a test; a missing suite means the root
    Test {
        id: String,
        title: String,
        #[serde(default)]
        suite: Option<String>,
        #[serde(default)]
        file: Option<PathBuf>,
        #[serde(default)]
        pending: bool,
    },

    TestStart {
        id: String,
    },

    TestEnd {
        id: String,
        state: TestState,
        #[serde(default)]
        duration_ms: Option<u64>,
        #[serde(default)]
        error: Option<TestError>,
        #[serde(default)]
        attachments: Vec<PathBuf>,
    },

    /// A failure in a test body (`test`) or in a setup/teardown step (`hook` + `suite`)
    Fail {
        #[serde(default)]
        test: Option<String>,
        #[serde(default)]
        hook: Option<String>,
        #[serde(default)]
        suite: Option<String>,
        error: TestError,
    },

    SuiteEnd {
        id: String,
    },

    RunEnd,
}
