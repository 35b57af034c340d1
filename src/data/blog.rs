//! Markdown documents with YAML front matter: blog posts and static pages.

use super::DataError;
use super::types::{BlogPost, StaticPage};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

const FENCE: &str = "---";
const DEFAULT_READ_TIME: &str = "5 min";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostFrontMatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    read_time: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    featured_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageFrontMatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    updated: Option<String>,
}

/// Split `---`-fenced YAML from the markdown body.
///
/// Without an opening fence on the first line, or without a closing fence,
/// the whole input is body.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(rest) = source
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, source)
}

fn parse_yaml<T: Default + for<'de> Deserialize<'de>>(
    yaml: Option<&str>,
    path: &Path,
) -> Result<T, DataError> {
    match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)
            .map_err(|err| DataError::FrontMatter(path.to_path_buf(), err)),
        _ => Ok(T::default()),
    }
}

/// Parse one post. The slug is the file stem.
pub fn parse_post(slug: &str, source: &str, path: &Path) -> Result<BlogPost, DataError> {
    let (yaml, body) = split_front_matter(source);
    let meta: PostFrontMatter = parse_yaml(yaml, path)?;

    Ok(BlogPost {
        slug: slug.to_string(),
        title: meta.title,
        author: meta.author,
        date: meta.date,
        read_time: meta
            .read_time
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
        tags: meta.tags,
        excerpt: meta.excerpt,
        featured_image: meta.featured_image.filter(|i| !i.is_empty()),
        content: body.to_string(),
    })
}

/// Parse one static page.
pub fn parse_page(slug: &str, source: &str, path: &Path) -> Result<StaticPage, DataError> {
    let (yaml, body) = split_front_matter(source);
    let meta: PageFrontMatter = parse_yaml(yaml, path)?;

    Ok(StaticPage {
        slug: slug.to_string(),
        title: meta.title,
        description: meta.description,
        updated: meta.updated.filter(|u| !u.is_empty()),
        content: body.to_string(),
    })
}

/// `*.md` files directly in `dir` with their stems, sorted by file name.
/// A missing directory yields nothing.
fn markdown_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, DataError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|err| DataError::Io(dir.to_path_buf(), err.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.push((stem.to_string(), path.to_path_buf()));
        }
    }
    Ok(files)
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|err| DataError::Io(path.to_path_buf(), err))
}

/// Every post in `dir`, newest first by date string.
pub fn load_posts(dir: &Path) -> Result<Vec<BlogPost>, DataError> {
    let mut posts = markdown_files(dir)?
        .into_iter()
        .map(|(slug, path)| parse_post(&slug, &read(&path)?, &path))
        .collect::<Result<Vec<_>, _>>()?;
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
}

/// Every static page in `dir`, by slug.
pub fn load_pages(dir: &Path) -> Result<Vec<StaticPage>, DataError> {
    markdown_files(dir)?
        .into_iter()
        .map(|(slug, path)| parse_page(&slug, &read(&path)?, &path))
        .collect()
}
