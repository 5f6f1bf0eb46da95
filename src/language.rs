// src/language.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, RunpadError};

const PYTHON_TEMPLATE: &str = "# Python Hello World\nname = input()\nprint(\"Hello,\", name)";

const JAVA_TEMPLATE: &str = "// Java Hello World\nimport java.util.*;\npublic class Main {\n  public static void main(String[] args) {\n    Scanner s = new Scanner(System.in);\n    String name = s.nextLine();\n    System.out.println(\"Hello, \" + name);\n  }\n}";

const CPP_TEMPLATE: &str = "// C++ Hello World\n#include <iostream>\nusing namespace std;\nint main() {\n    string name;\n    cin >> name;\n    cout << \"Hello, \" << name << endl;\n    return 0;\n}";

/// Editor mode used when a language token has no syntax highlighting of its own.
pub const PLAIN_TEXT_MODE: &str = "plaintext";

/// A language the execution service can compile or interpret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
    Cpp,
}

/// Where the current buffer lands when it is saved locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportMapping {
    pub extension: &'static str,
    pub filename: &'static str,
}

impl Language {
    /// Every supported language, in picker order.
    pub const ALL: [Language; 3] = [Language::Python, Language::Java, Language::Cpp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
        }
    }

    /// Starter program placed in the editor when this language is selected.
    pub fn template(&self) -> &'static str {
        match self {
            Language::Python => PYTHON_TEMPLATE,
            Language::Java => JAVA_TEMPLATE,
            Language::Cpp => CPP_TEMPLATE,
        }
    }

    pub fn export_mapping(&self) -> ExportMapping {
        match self {
            Language::Python => ExportMapping { extension: "py", filename: "code.py" },
            Language::Java => ExportMapping { extension: "java", filename: "Main.java" },
            Language::Cpp => ExportMapping { extension: "cpp", filename: "main.cpp" },
        }
    }

    pub fn editor_mode(&self) -> &'static str {
        editor_mode_for(self.as_str())
    }
}

/// Maps a language token to the editor's syntax mode. Unknown tokens map to
/// [`PLAIN_TEXT_MODE`].
pub fn editor_mode_for(token: &str) -> &'static str {
    match token {
        "python" => "python",
        "java" => "java",
        "cpp" | "c++" => "cpp",
        _ => PLAIN_TEXT_MODE,
    }
}

impl FromStr for Language {
    type Err = RunpadError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| RunpadError::UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_languages() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("java".parse::<Language>().unwrap(), Language::Java);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
    }

    #[test]
    fn test_parse_rejects_unknown_language() {
        let err = "rust".parse::<Language>().unwrap_err();
        assert!(matches!(err, RunpadError::UnsupportedLanguage(ref l) if l == "rust"));
        assert!("Python".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_every_language_has_template_and_export_mapping() {
        for lang in Language::ALL {
            assert!(!lang.template().is_empty());
            let mapping = lang.export_mapping();
            assert!(mapping.filename.ends_with(&format!(".{}", mapping.extension)));
        }
        assert_eq!(Language::Java.export_mapping().filename, "Main.java");
        assert_eq!(Language::Cpp.export_mapping().filename, "main.cpp");
        assert_eq!(Language::Python.export_mapping().filename, "code.py");
    }

    #[test]
    fn test_editor_mode_degrades_to_plain_text() {
        assert_eq!(editor_mode_for("python"), "python");
        assert_eq!(editor_mode_for("c++"), "cpp");
        assert_eq!(editor_mode_for("cpp"), "cpp");
        assert_eq!(editor_mode_for("haskell"), PLAIN_TEXT_MODE);
        assert_eq!(editor_mode_for(""), PLAIN_TEXT_MODE);
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        assert_eq!(serde_json::to_string(&Language::Cpp).unwrap(), "\"cpp\"");
        let lang: Language = serde_json::from_str("\"java\"").unwrap();
        assert_eq!(lang, Language::Java);
    }
}
