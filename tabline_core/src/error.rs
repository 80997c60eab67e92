//! core 仅有的两类失败：候选构造与选项解析。

/// 候选构造失败。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateError {
    /// `value` 为空：没有可以插入的内容
    #[error("候选的 value 不能为空")]
    EmptyValue,
}

/// 选项（TOML）解析失败。
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("补全选项解析失败：{0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(CandidateError::EmptyValue.to_string(), "候选的 value 不能为空");
    }
}
