use std::path::{Path, PathBuf};

use crate::color::{Color, ColorValue};
use crate::error::{NinePatchError, NinePatchResult};

/// One requested output image.
///
/// Colors fall back along border -> fill -> background -> transparent black;
/// `border_radius` defaults to 5 and `border_width` to 1.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// The color of all pixels outside the rounded rectangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
    /// The color inside the border.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<ColorValue>,
    /// The border color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorValue>,
    /// Corner curve radius in pixels. 0 means no visible border circle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    /// Border stroke width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Where the image is written, resolved against the output directory.
    pub out_file: PathBuf,
}

/// A full generation request: global path options plus the image list.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Working directory used to resolve relative paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Config file to merge into this request, resolved against `cwd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    /// Base directory for generated images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    /// The images to generate.
    #[serde(default)]
    pub images: Vec<ImageConfig>,
}

impl ImageConfig {
    /// Check this entry without doing any rasterization work.
    pub fn validate(&self) -> NinePatchResult<()> {
        if self.out_file.as_os_str().is_empty() {
            return Err(NinePatchError::configuration(
                "image has no outFile to write to",
            ));
        }
        self.check_color("backgroundColor", &self.background_color)?;
        self.check_color("fillColor", &self.fill_color)?;
        self.check_color("borderColor", &self.border_color)?;
        Ok(())
    }

    fn check_color(&self, field: &str, value: &Option<ColorValue>) -> NinePatchResult<()> {
        let Some(value) = value else {
            return Ok(());
        };
        Color::parse(value).map(drop).map_err(|err| match err {
            NinePatchError::Format(msg) => NinePatchError::format(format!(
                "image '{}': {}: {}",
                self.out_file.display(),
                field,
                msg
            )),
            other => other,
        })
    }
}

impl GeneratorConfig {
    /// The effective working directory.
    pub fn cwd(&self) -> PathBuf {
        self.cwd
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// The effective output directory (`<cwd>/out` unless configured).
    pub fn out_dir(&self) -> PathBuf {
        match &self.out_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.cwd().join(dir),
            None => self.cwd().join("out"),
        }
    }

    /// Merge in the config file: the explicitly named one, else
    /// `ninepatcher.json` under `cwd` when present.
    ///
    /// File-loaded fields only fill gaps in this request, so values set
    /// up front (e.g. CLI flags) always win.
    pub fn resolve(mut self) -> NinePatchResult<Self> {
        let cwd = self.cwd();
        let file = match &self.config {
            Some(explicit) => Some(cwd.join(explicit)),
            None => {
                let default = cwd.join("ninepatcher.json");
                default.exists().then_some(default)
            }
        };
        if let Some(path) = file {
            let loaded = load_config_file(&path)?;
            if self.cwd.is_none() {
                self.cwd = loaded.cwd;
            }
            if self.out_dir.is_none() {
                self.out_dir = loaded.out_dir;
            }
            if self.images.is_empty() {
                self.images = loaded.images;
            }
        }
        Ok(self)
    }

    /// Fail fast before any rasterization: at least one image, and every
    /// entry individually well-formed.
    pub fn validate(&self) -> NinePatchResult<()> {
        if self.images.is_empty() {
            return Err(NinePatchError::configuration(
                "found no images to generate",
            ));
        }
        for image in &self.images {
            image.validate()?;
        }
        Ok(())
    }
}

/// Read and parse a JSON-with-comments config file.
pub fn load_config_file(path: &Path) -> NinePatchResult<GeneratorConfig> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        NinePatchError::configuration(format!("read config '{}': {err}", path.display()))
    })?;
    let stripped = strip_jsonc_comments(&raw);
    serde_json::from_str(&stripped).map_err(|err| {
        NinePatchError::configuration(format!("parse config '{}': {err}", path.display()))
    })
}

/// Remove `//` line comments and `/* ... */` block comments, leaving string
/// literals untouched. Newlines inside block comments are preserved so
/// parse errors keep their line numbers.
pub fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    for n in chars.by_ref() {
                        if n == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for n in chars.by_ref() {
                        if n == '\n' {
                            out.push('\n');
                        }
                        if prev == '*' && n == '/' {
                            break;
                        }
                        prev = n;
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_config() -> GeneratorConfig {
        GeneratorConfig {
            images: vec![ImageConfig {
                background_color: Some(ColorValue::Text("rgba(0,0,0,0)".to_string())),
                fill_color: Some(ColorValue::Text("#00FF00".to_string())),
                border_color: Some(ColorValue::Packed(0x000000FF)),
                border_radius: Some(5.0),
                border_width: Some(1.0),
                out_file: PathBuf::from("button.png"),
            }],
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn json_roundtrip() {
        let config = basic_config();
        let s = serde_json::to_string_pretty(&config).unwrap();
        assert!(s.contains("outFile"));
        assert!(s.contains("borderRadius"));
        let de: GeneratorConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(de.images.len(), 1);
        assert_eq!(de.images[0].out_file, PathBuf::from("button.png"));
    }

    #[test]
    fn deserializes_all_color_encodings() {
        let json = r##"{
            "images": [{
                "backgroundColor": 16711935,
                "fillColor": "#01020304",
                "borderColor": [1, 2, 3],
                "outFile": "x.png"
            }]
        }"##;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        let image = &config.images[0];
        assert_eq!(image.background_color, Some(ColorValue::Packed(16711935)));
        assert_eq!(
            image.fill_color,
            Some(ColorValue::Text("#01020304".to_string()))
        );
        assert_eq!(
            image.border_color,
            Some(ColorValue::Channels(vec![1.0, 2.0, 3.0]))
        );
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_image_list() {
        let config = GeneratorConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no images"));
    }

    #[test]
    fn validate_rejects_missing_out_file() {
        let mut config = basic_config();
        config.images[0].out_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_names_the_bad_color_field() {
        let mut config = basic_config();
        config.images[0].border_color = Some(ColorValue::Text("rgb(1,2".to_string()));
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("button.png"));
        assert!(msg.contains("borderColor"));
        assert!(msg.contains("rgb(1,2"));
    }

    #[test]
    fn strips_line_and_block_comments() {
        let jsonc = "{\n  // the images\n  \"images\": [] /* none yet */\n}\n";
        let stripped = strip_jsonc_comments(jsonc);
        let config: GeneratorConfig = serde_json::from_str(&stripped).unwrap();
        assert!(config.images.is_empty());
    }

    #[test]
    fn comment_stripping_leaves_strings_alone() {
        let jsonc = r#"{"images": [{"outFile": "a//b.png"}]}"#;
        let stripped = strip_jsonc_comments(jsonc);
        let config: GeneratorConfig = serde_json::from_str(&stripped).unwrap();
        assert_eq!(config.images[0].out_file, PathBuf::from("a//b.png"));
    }

    #[test]
    fn out_dir_defaults_under_cwd() {
        let config = GeneratorConfig {
            cwd: Some(PathBuf::from("/work")),
            ..GeneratorConfig::default()
        };
        assert_eq!(config.out_dir(), PathBuf::from("/work/out"));

        let config = GeneratorConfig {
            cwd: Some(PathBuf::from("/work")),
            out_dir: Some(PathBuf::from("assets")),
            ..GeneratorConfig::default()
        };
        assert_eq!(config.out_dir(), PathBuf::from("/work/assets"));
    }
}
