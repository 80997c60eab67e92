//! `options`：补全行为选项，显式传给 engine/session，不使用全局状态。

use serde::{Deserialize, Serialize};

use crate::{error::OptionsError, rank::MissingSortKey};

/// 补全选项。未出现在配置里的字段取默认值。
///
/// ```toml
/// group = true
/// case_insensitive = false
/// insert_common_prefix = true
/// auto_menu = true
/// list_rows_first = true
/// missing_sort_key = "as_zero"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOptions {
    /// 按 `group` 标签分组展示（默认开）
    pub group: bool,
    /// 前缀匹配忽略大小写（默认关）
    pub case_insensitive: bool,
    /// 多个候选时插入最长公共前缀（默认开）
    pub insert_common_prefix: bool,
    /// 第二次触发展示列表的同时选中第一个候选（默认开）
    pub auto_menu: bool,
    /// 列表按行填充（默认开）；关闭则按列填充
    pub list_rows_first: bool,
    /// 缺省 `sort_key` 的排位（默认视为 0）
    pub missing_sort_key: MissingSortKey,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            group: true,
            case_insensitive: false,
            insert_common_prefix: true,
            auto_menu: true,
            list_rows_first: true,
            missing_sort_key: MissingSortKey::AsZero,
        }
    }
}

impl CompletionOptions {
    /// 从 TOML 文本解析选项。
    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(s)?)
    }
}
