//! Shared query-shaping helpers used by every read path, so a novel
//! listing and a novel detail never drift apart.

use crate::entities::chapter_entity as chapters;
use crate::models::{CommentResponse, ReadingFilter, ReadingStatEntry};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn style_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 行内 style 在编辑器粘贴时混进来，展示前全部剥掉
    RE.get_or_init(|| Regex::new(r#"(?i)\sstyle\s*=\s*("[^"]*"|'[^']*')"#).expect("valid regex"))
}

/// Character count of the HTML-stripped content.
pub fn word_count(content: &str) -> i64 {
    html_tag_re()
        .replace_all(content, "")
        .chars()
        .count() as i64
}

/// Drop inline `style=` attributes from stored chapter HTML.
pub fn scrub_inline_styles(content: &str) -> String {
    style_attr_re().replace_all(content, "").into_owned()
}

/// Sort by explicit `chapter_order`, not creation time. The sort is
/// stable, so rows sharing an order keep their fetch order.
pub fn sort_chapters(mut rows: Vec<chapters::Model>) -> Vec<chapters::Model> {
    rows.sort_by_key(|c| c.chapter_order);
    rows
}

/// Build a nested comment tree from a flat, chronologically ascending
/// list. A comment whose parent is not in the list becomes a root.
pub fn build_comment_tree(flat: Vec<CommentResponse>) -> Vec<CommentResponse> {
    let ids: std::collections::HashSet<i64> = flat.iter().map(|c| c.id).collect();

    let mut roots: Vec<CommentResponse> = Vec::new();
    let mut children: HashMap<i64, Vec<CommentResponse>> = HashMap::new();

    for comment in flat {
        match comment.parent_id {
            Some(parent_id) if parent_id != comment.id && ids.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(comment);
            }
            _ => roots.push(comment),
        }
    }

    fn attach(node: &mut CommentResponse, children: &mut HashMap<i64, Vec<CommentResponse>>) {
        if let Some(mut kids) = children.remove(&node.id) {
            for kid in &mut kids {
                attach(kid, children);
            }
            node.replies = kids;
        }
    }

    for root in &mut roots {
        attach(root, &mut children);
    }

    roots
}

/// One joined reading-record row, denormalized for aggregation.
#[derive(Debug, Clone)]
pub struct ReadingRow {
    pub user_id: i64,
    pub user_name: String,
    pub novel_id: i64,
    pub novel_title: String,
    pub author_id: i64,
    pub author_name: String,
    pub reading_time: i64,
}

/// Group one month of reading rows by the chosen dimension, sum the
/// seconds, and sort by total descending.
pub fn aggregate_reading_time(rows: &[ReadingRow], filter: ReadingFilter) -> Vec<ReadingStatEntry> {
    let mut order: Vec<i64> = Vec::new();
    let mut totals: HashMap<i64, ReadingStatEntry> = HashMap::new();

    for row in rows {
        let (key, name) = match filter {
            ReadingFilter::User => (row.user_id, row.user_name.clone()),
            ReadingFilter::Novel => (row.novel_id, row.novel_title.clone()),
            ReadingFilter::Author => (row.author_id, row.author_name.clone()),
        };
        let entry = totals.entry(key).or_insert_with(|| {
            order.push(key);
            ReadingStatEntry {
                name,
                total_time: 0,
            }
        });
        entry.total_time += row.reading_time;
    }

    let mut result: Vec<ReadingStatEntry> = order
        .into_iter()
        .filter_map(|key| totals.remove(&key))
        .collect();
    result.sort_by(|a, b| b.total_time.cmp(&a.total_time));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: i64, order: i32) -> chapters::Model {
        chapters::Model {
            id,
            novel_id: 1,
            title: format!("第{order}章"),
            content: String::new(),
            is_free: None,
            published: true,
            chapter_order: order,
            quotation: None,
            word_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    fn comment(id: i64, parent_id: Option<i64>) -> CommentResponse {
        CommentResponse {
            id,
            content: format!("comment {id}"),
            parent_id,
            user_id: 1,
            user_name: "书虫".to_string(),
            chapter_title: None,
            created_at: None,
            updated_at: None,
            replies: Vec::new(),
        }
    }

    #[test]
    fn test_sort_chapters_by_order() {
        let sorted = sort_chapters(vec![chapter(10, 3), chapter(11, 1), chapter(12, 2)]);
        let orders: Vec<i32> = sorted.iter().map(|c| c.chapter_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_chapters_stable_on_ties() {
        let sorted = sort_chapters(vec![chapter(10, 1), chapter(11, 1), chapter(12, 0)]);
        let ids: Vec<i64> = sorted.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![12, 10, 11]);
    }

    #[test]
    fn test_build_comment_tree() {
        let tree = build_comment_tree(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].id, 2);
        assert_eq!(tree[1].id, 3);
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn test_comment_with_missing_parent_becomes_root() {
        let tree = build_comment_tree(vec![comment(5, Some(999)), comment(6, None)]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 5);
    }

    #[test]
    fn test_nested_replies_attach_to_their_parent() {
        let tree = build_comment_tree(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].replies[0].replies[0].id, 3);
    }

    #[test]
    fn test_aggregate_reading_time_by_novel() {
        let row = |novel_id: i64, title: &str, time: i64| ReadingRow {
            user_id: 1,
            user_name: "u".to_string(),
            novel_id,
            novel_title: title.to_string(),
            author_id: 1,
            author_name: "a".to_string(),
            reading_time: time,
        };
        let stats = aggregate_reading_time(
            &[row(1, "A", 10), row(1, "A", 5), row(2, "B", 7)],
            ReadingFilter::Novel,
        );
        assert_eq!(
            stats,
            vec![
                ReadingStatEntry {
                    name: "A".to_string(),
                    total_time: 15
                },
                ReadingStatEntry {
                    name: "B".to_string(),
                    total_time: 7
                },
            ]
        );
    }

    #[test]
    fn test_word_count_strips_markup() {
        assert_eq!(word_count("<p>你好，世界</p>"), 5);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_scrub_inline_styles() {
        let html = r#"<p style="color: red">你好</p><span STYLE='x'>世界</span>"#;
        assert_eq!(scrub_inline_styles(html), "<p>你好</p><span>世界</span>");
    }
}
