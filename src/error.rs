pub type NinePatchResult<T> = Result<T, NinePatchError>;

#[derive(thiserror::Error, Debug)]
pub enum NinePatchError {
    #[error("format error: {0}")]
    Format(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NinePatchError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            NinePatchError::format("x")
                .to_string()
                .contains("format error:")
        );
        assert!(
            NinePatchError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
        assert!(
            NinePatchError::encoding("x")
                .to_string()
                .contains("encoding error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = NinePatchError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
