//! Reddit post processing: mention counting and post conversion.

use trendradar_core::ForumPost;

use super::reddit::Post;

/// Number of `titles` containing `keyword` as a case-insensitive substring.
pub(super) fn count_title_mentions<'a, I>(titles: I, keyword: &str) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let count = titles
        .into_iter()
        .filter(|title| title.to_lowercase().contains(&needle))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub(super) fn to_forum_post(post: &Post) -> Option<ForumPost> {
    let permalink = post.data.permalink.as_deref()?;
    let title = post
        .data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())?;

    Some(ForumPost {
        title: title.to_string(),
        url: format!("https://reddit.com{permalink}"),
    })
}
