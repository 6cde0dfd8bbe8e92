//! 输入规整辅助函数
//!
//! - unique_ids：接入批次去重

use domain::ObjectId;
use std::collections::HashSet;

/// 去重并保持首次出现的顺序。
///
/// `insert ... on conflict do update` 不允许同一语句内出现重复主键，
/// 写入前必须先去重。
pub fn unique_ids(ids: &[ObjectId]) -> Vec<ObjectId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::unique_ids;

    #[test]
    fn keeps_first_occurrence_order() {
        assert_eq!(unique_ids(&[5, 5, 7, 5, 3, 7]), vec![5, 7, 3]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(unique_ids(&[]).is_empty());
    }
}
