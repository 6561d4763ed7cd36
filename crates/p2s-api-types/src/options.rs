//! Generation options sent with a submission.
//!
//! Every option travels as a plain string form field next to the uploaded
//! files. The enums accept and produce the exact lowercase strings the
//! service understands, both through serde (configuration files) and
//! through `FromStr`/`Display` (command-line values).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OptionError;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $option:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = OptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(OptionError::invalid(
                        $option,
                        s,
                        concat!($($text, " "),+),
                    )),
                }
            }
        }
    };
}

string_enum! {
    /// Kind of source document.
    ContentKind, "content" {
        /// Academic paper; enables paper-specific extraction.
        Paper => "paper",
        General => "general",
    }
}

string_enum! {
    /// What the service should produce.
    OutputType, "output_type" {
        Slides => "slides",
        Poster => "poster",
    }
}

string_enum! {
    /// Deck length, used for slides only.
    SlideLength, "length" {
        Short => "short",
        Medium => "medium",
        Long => "long",
    }
}

string_enum! {
    /// Text density, used for posters only.
    PosterDensity, "density" {
        Sparse => "sparse",
        Medium => "medium",
        Dense => "dense",
    }
}

/// The configuration record transmitted with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_content")]
    pub content: ContentKind,
    #[serde(default = "default_output_type")]
    pub output_type: OutputType,
    /// `academic`, `doraemon`, or a free-form style description.
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_length")]
    pub length: SlideLength,
    #[serde(default = "default_density")]
    pub density: PosterDensity,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub fast_mode: bool,
    /// Optional instruction text accompanying the upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_content() -> ContentKind {
    ContentKind::General
}

fn default_output_type() -> OutputType {
    OutputType::Slides
}

fn default_style() -> String {
    "academic".to_string()
}

fn default_length() -> SlideLength {
    SlideLength::Medium
}

fn default_density() -> PosterDensity {
    PosterDensity::Medium
}

fn default_language() -> String {
    "vietnamese".to_string()
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            content: default_content(),
            output_type: default_output_type(),
            style: default_style(),
            length: default_length(),
            density: default_density(),
            language: default_language(),
            fast_mode: false,
            message: None,
        }
    }
}

impl GenerationOptions {
    /// Form fields for the multipart submission, in a stable order.
    ///
    /// `length` is only meaningful for slides and `density` only for
    /// posters, so each is sent for its own output type.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("content", self.content.to_string()),
            ("output_type", self.output_type.to_string()),
            ("style", self.style.clone()),
        ];

        match self.output_type {
            OutputType::Slides => fields.push(("length", self.length.to_string())),
            OutputType::Poster => fields.push(("density", self.density.to_string())),
        }

        fields.push(("language", self.language.clone()));
        fields.push(("fast_mode", self.fast_mode.to_string()));

        if let Some(message) = &self.message {
            fields.push(("message", message.clone()));
        }

        fields
    }
}
