//! Core data types for the CodePilot orchestration layer
//!
//! This module defines the records exchanged between the editor views and the
//! orchestrators: code buffers, conversation turns, and the typed reports
//! extracted from generative service responses.

use crate::error::CodePilotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single suggestion line shown in the suggestions panel
pub type Suggestion = String;

/// Languages offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Swift,
    Go,
    Rust,
}

impl Language {
    /// Every language in selector order
    pub const ALL: [Language; 10] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::CSharp,
        Language::Php,
        Language::Ruby,
        Language::Swift,
        Language::Go,
        Language::Rust,
    ];

    /// Identifier used in prompts and in the handoff store
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// Human-readable name for the language selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
            Language::Swift => "Swift",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }

    /// File extension used when downloading the buffer
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Python => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::CSharp => "cs",
            Language::Php => "php",
            Language::Ruby => "rb",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::Rust => "rs",
        }
    }

    /// Guess the language from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "php" => Some(Language::Php),
            "rb" => Some(Language::Ruby),
            "swift" => Some(Language::Swift),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    /// Starter template loaded when the user switches to this language
    pub fn template(&self) -> &'static str {
        match self {
            Language::JavaScript => {
                "// JavaScript code here\nfunction example() {\n  return \"Hello, World!\";\n}"
            }
            Language::Python => "# Python code here\ndef example():\n    return \"Hello, World!\"",
            Language::Java => {
                "// Java code here\npublic class Example {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}"
            }
            Language::Cpp => {
                "// C++ code here\n#include <iostream>\n\nint main() {\n    std::cout << \"Hello, World!\" << std::endl;\n    return 0;\n}"
            }
            Language::CSharp => {
                "// C# code here\nusing System;\n\nclass Program {\n    static void Main() {\n        Console.WriteLine(\"Hello, World!\");\n    }\n}"
            }
            Language::Php => {
                "<?php\n// PHP code here\nfunction example() {\n    return \"Hello, World!\";\n}\n?>"
            }
            Language::Ruby => "# Ruby code here\ndef example\n  \"Hello, World!\"\nend",
            Language::Swift => {
                "// Swift code here\nfunc example() -> String {\n    return \"Hello, World!\"\n}"
            }
            Language::Go => {
                "// Go code here\npackage main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, World!\")\n}"
            }
            Language::Rust => "// Rust code here\nfn main() {\n    println!(\"Hello, World!\");\n}",
        }
    }

    /// Testing framework named in test-generation prompts
    pub fn test_framework(&self) -> &'static str {
        match self {
            Language::JavaScript => "Jest",
            Language::Python => "unittest",
            Language::Java => "JUnit",
            Language::Cpp => "GoogleTest",
            Language::CSharp => "xUnit",
            Language::Php => "PHPUnit",
            Language::Ruby => "RSpec",
            Language::Swift => "XCTest",
            Language::Go => "the testing package",
            Language::Rust => "the built-in #[test] harness",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Language {
    type Err = CodePilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.id() == needle)
            .ok_or_else(|| CodePilotError::UnknownLanguage(s.to_string()))
    }
}

/// The code currently held by the active view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBuffer {
    pub content: String,
    pub language: Language,
}

impl CodeBuffer {
    pub fn new(content: impl Into<String>, language: Language) -> Self {
        Self {
            content: content.into(),
            language,
        }
    }

    /// Buffer reset to the starter template of `language`
    pub fn from_template(language: Language) -> Self {
        Self::new(language.template(), language)
    }

    /// Name offered when the buffer is downloaded
    pub fn download_file_name(&self) -> String {
        format!("code.{}", self.language.extension())
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new("// Start coding here...", Language::JavaScript)
    }
}

/// Position of a turn in the conversation log.
///
/// Assigned when the request is issued, never when the response arrives.
pub type SequenceId = u64;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One segment of a turn's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MessagePart {
    /// Prose outside any fenced block
    Text { content: String },

    /// Body of a fenced block; `language_hint` is empty when the fence had no tag
    Code {
        content: String,
        language_hint: String,
    },
}

impl MessagePart {
    pub fn text(content: impl Into<String>) -> Self {
        MessagePart::Text {
            content: content.into(),
        }
    }

    pub fn code(content: impl Into<String>, language_hint: impl Into<String>) -> Self {
        MessagePart::Code {
            content: content.into(),
            language_hint: language_hint.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            MessagePart::Text { content } | MessagePart::Code { content, .. } => content,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, MessagePart::Code { .. })
    }
}

/// An immutable entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub sequence_id: SequenceId,
    pub role: Role,
    pub parts: Vec<MessagePart>,
    pub is_error: bool,
}

impl ConversationTurn {
    /// Concatenated part contents
    pub fn plain_text(&self) -> String {
        self.parts.iter().map(MessagePart::content).collect()
    }
}

/// Category of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    #[serde(alias = "Bug", alias = "BUG")]
    Bug,
    #[serde(alias = "Performance", alias = "PERFORMANCE")]
    Performance,
    #[serde(alias = "Security", alias = "SECURITY")]
    Security,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::Bug => "Bug",
            IssueKind::Performance => "Performance",
            IssueKind::Security => "Security",
        };
        write!(f, "{}", label)
    }
}

/// A single finding of the code analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub line: u32,
    pub message: String,
}

/// Bug and complexity report for a code buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IssueReportWire", into = "IssueReportWire")]
pub struct IssueReport {
    pub issues: Vec<Issue>,
    pub performance_score: i64,
    pub performance_suggestions: Vec<String>,
    pub complexity_score: i64,
    pub complexity_details: String,
}

impl IssueReport {
    /// Top-level keys the analysis response must carry
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["issues", "performance", "complexity"];
}

/// Shape the service is asked to produce
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IssueReportWire {
    issues: Vec<Issue>,
    performance: PerformanceWire,
    complexity: ComplexityWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PerformanceWire {
    score: i64,
    suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ComplexityWire {
    score: i64,
    details: String,
}

impl From<IssueReportWire> for IssueReport {
    fn from(wire: IssueReportWire) -> Self {
        Self {
            issues: wire.issues,
            performance_score: wire.performance.score,
            performance_suggestions: wire.performance.suggestions,
            complexity_score: wire.complexity.score,
            complexity_details: wire.complexity.details,
        }
    }
}

impl From<IssueReport> for IssueReportWire {
    fn from(report: IssueReport) -> Self {
        Self {
            issues: report.issues,
            performance: PerformanceWire {
                score: report.performance_score,
                suggestions: report.performance_suggestions,
            },
            complexity: ComplexityWire {
                score: report.complexity_score,
                details: report.complexity_details,
            },
        }
    }
}

/// Simulated result of running a test suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPrediction {
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
    pub coverage: String,
    pub duration: String,
}

impl TestPrediction {
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["passed", "failed", "total", "coverage", "duration"];
}

/// Explanation of a runtime or compiler error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDiagnosis {
    pub error_type: String,
    pub cause: String,
    pub solutions: Vec<String>,
}

/// Lifecycle of one logical request
///
/// `Idle → Pending → InFlight → Resolved | Failed`; `Pending` only exists for
/// debounced requests waiting out their quiet period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    #[default]
    Idle,
    Pending,
    InFlight,
    Resolved,
    Failed,
}

impl RequestPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestPhase::Pending | RequestPhase::InFlight)
    }
}
