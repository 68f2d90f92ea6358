// crates/dojo-types/src/lang.rs
// ============================================================================
// Module: Trainer Languages
// Description: Closed vocabulary of trainer language identifiers.
// Purpose: Map language enum values to their stable wire identifiers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Languages the trainer can start a session in. The wire identifier appears
//! in URLs (route templates use a `{language}` placeholder for it) and in
//! runner payloads. The set is closed; identifiers outside it are rejected
//! at the parsing boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Known Languages
// ============================================================================

/// Declares the closed language vocabulary with its wire identifiers.
macro_rules! known_lang {
    ($($(#[$doc:meta])* $variant:ident => $id:literal),+ $(,)?) => {
        /// Language identifier known to the trainer.
        ///
        /// # Invariants
        /// - The wire form is the lowercase identifier the trainer uses in
        ///   URLs and runner payloads.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum KnownLang {
            $($(#[$doc])* #[serde(rename = $id)] $variant,)+
        }

        impl KnownLang {
            /// Returns the wire identifier for this language.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $id,)+
                }
            }

            /// Looks up a language by its wire identifier.
            #[must_use]
            pub fn from_lang_id(id: &str) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

known_lang! {
    /// Agda.
    Agda => "agda",
    /// Brainfuck.
    BrainFuck => "bf",
    /// C.
    C => "c",
    /// CFML.
    Cfml => "cfml",
    /// Clojure.
    Clojure => "clojure",
    /// COBOL.
    Cobol => "cobol",
    /// CoffeeScript.
    CoffeeScript => "coffeescript",
    /// Common Lisp.
    CommonLisp => "commonlisp",
    /// Coq.
    Coq => "coq",
    /// C++.
    Cpp => "cpp",
    /// Crystal.
    Crystal => "crystal",
    /// C#.
    CSharp => "csharp",
    /// D.
    D => "d",
    /// Dart.
    Dart => "dart",
    /// Elixir.
    Elixir => "elixir",
    /// Elm.
    Elm => "elm",
    /// Erlang.
    Erlang => "erlang",
    /// Factor.
    Factor => "factor",
    /// Forth.
    Forth => "forth",
    /// Fortran.
    Fortran => "fortran",
    /// F#.
    FSharp => "fsharp",
    /// Go.
    Go => "go",
    /// Groovy.
    Groovy => "groovy",
    /// Haskell.
    Haskell => "haskell",
    /// Haxe.
    Haxe => "haxe",
    /// Idris.
    Idris => "idris",
    /// Java.
    Java => "java",
    /// JavaScript.
    JavaScript => "javascript",
    /// Julia.
    Julia => "julia",
    /// Kotlin.
    Kotlin => "kotlin",
    /// Lambda calculus.
    LambdaCalc => "lambdacalc",
    /// Lean.
    Lean => "lean",
    /// Lua.
    Lua => "lua",
    /// NASM.
    Nasm => "nasm",
    /// Nim.
    Nim => "nim",
    /// Objective-C.
    ObjC => "objc",
    /// OCaml.
    OCaml => "ocaml",
    /// Pascal.
    Pascal => "pascal",
    /// Perl.
    Perl => "perl",
    /// PHP.
    Php => "php",
    /// PowerShell.
    PowerShell => "powershell",
    /// Prolog.
    Prolog => "prolog",
    /// PureScript.
    PureScript => "purescript",
    /// Python.
    Python => "python",
    /// R.
    R => "r",
    /// Racket.
    Racket => "racket",
    /// Raku.
    Raku => "raku",
    /// Reason.
    Reason => "reason",
    /// RISC-V assembly.
    RiscV => "riscv",
    /// Ruby.
    Ruby => "ruby",
    /// Rust.
    Rust => "rust",
    /// Scala.
    Scala => "scala",
    /// Shell.
    Shell => "shell",
    /// Solidity.
    Solidity => "solidity",
    /// SQL.
    Sql => "sql",
    /// Swift.
    Swift => "swift",
    /// TypeScript.
    TypeScript => "typescript",
    /// Visual Basic.
    Vb => "vb",
}

impl fmt::Display for KnownLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for identifiers outside the known language set.
#[derive(Debug, Error)]
#[error("unknown language identifier: {0}")]
pub struct UnknownLang(pub String);

impl FromStr for KnownLang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_lang_id(s).ok_or_else(|| UnknownLang(s.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use std::str::FromStr;

    use super::KnownLang;

    #[test]
    fn wire_identifiers_round_trip() {
        for lang in [
            KnownLang::Rust,
            KnownLang::JavaScript,
            KnownLang::Cpp,
            KnownLang::FSharp,
            KnownLang::Erlang,
            KnownLang::Julia,
            KnownLang::ObjC,
            KnownLang::BrainFuck,
        ] {
            assert_eq!(KnownLang::from_lang_id(lang.as_str()), Some(lang));
            assert_eq!(KnownLang::from_str(lang.as_str()).unwrap(), lang);
        }
    }

    #[test]
    fn less_common_identifiers_are_known() {
        for id in ["fsharp", "groovy", "nim", "prolog", "r", "racket", "perl", "riscv", "vb"] {
            assert!(KnownLang::from_lang_id(id).is_some(), "{id} should be known");
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert!(KnownLang::from_lang_id("fortran77").is_none());
        assert!(KnownLang::from_str("fortran77").is_err());
    }

    #[test]
    fn serde_uses_wire_identifier() {
        let json = serde_json::to_string(&KnownLang::Rust).unwrap();
        assert_eq!(json, "\"rust\"");
        let back: KnownLang = serde_json::from_str("\"typescript\"").unwrap();
        assert_eq!(back, KnownLang::TypeScript);
    }
}
