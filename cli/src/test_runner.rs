use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use emitter::{DEFAULT_TITLE, RenderOptions};
use marksmith::MarkupError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning must be reported on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    /// Human-readable test description.
    pub description: Option<String>,

    /// Title used when the document has no `@@` line.
    pub title: Option<String>,

    /// Stylesheets to link, in order.
    pub stylesheets: Vec<PathBuf>,

    /// The whole rendered page (trimmed comparison).
    pub expect_output: Option<String>,

    /// Snippets that must each appear somewhere in the rendered page.
    pub expect_contains: Vec<String>,

    /// If present (even empty), warning count and content are checked.
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

impl Fixture {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            default_title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            stylesheets: self.stylesheets.clone(),
            ..RenderOptions::default()
        }
    }
}

/// Split a `.test.md` file into its TOML frontmatter and document source.
fn parse_test_file(content: &str) -> Result<(Fixture, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;
    let frontmatter = after_open[..close].trim_end_matches('\r');
    let rest = &after_open[close + "\n---".len()..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let fixture: Fixture =
        toml::from_str(frontmatter).map_err(|e| format!("TOML parse error: {}", e))?;
    Ok((fixture, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".test.md"))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };
    let (fixture, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = fixture.description.clone();

    let (html, diagnostics) = match emitter::render_str(source, &fixture.options()) {
        Ok(rendered) => rendered,
        Err(e) => return fail(description, format!("render failed: {}", e)),
    };

    let failure = check_output(&fixture, &html).or_else(|| {
        fixture
            .expect_warnings
            .as_deref()
            .and_then(|expected| check_warnings(&diagnostics, expected))
    });

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: match failure {
            Some(reason) => TestOutcome::Fail(reason),
            None => TestOutcome::Pass,
        },
    }
}

/// Compare the rendered page against `expect_output` and `expect_contains`.
fn check_output(fixture: &Fixture, html: &str) -> Option<String> {
    if let Some(expected) = &fixture.expect_output {
        if expected.trim() != html.trim() {
            return Some(format!(
                "output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                expected.trim(),
                html.trim()
            ));
        }
    }

    fixture
        .expect_contains
        .iter()
        .find(|snippet| !html.contains(snippet.as_str()))
        .map(|snippet| {
            format!(
                "output does not contain:\n{}\n--- actual ---\n{}",
                snippet,
                html.trim()
            )
        })
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(diagnostics: &[MarkupError], expected: &[ExpectedWarning]) -> Option<String> {
    let warnings: Vec<&MarkupError> = diagnostics.iter().filter(|d| d.is_warning()).collect();

    if warnings.len() != expected.len() {
        let actual: Vec<String> = warnings.iter().map(|w| format!("  - {}", w)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual.is_empty() {
                "    (none)".to_string()
            } else {
                actual.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }
        if let Some(line) = expected.line {
            if actual.line != line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but reported on line {}",
                    i, line, actual.line
                ));
            }
        }
    }

    None
}

/// `.test.md` files grouped by their folder relative to `root`, sorted.
/// Files directly in `root` get the category "".
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
            continue;
        }
        let is_fixture = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".test.md"));
        if is_fixture {
            let category = path
                .parent()
                .and_then(|parent| parent.strip_prefix(root).ok())
                .map(|parent| parent.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// Keep only the requested categories and their subfolders.
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let request = request.trim_matches('/');
        let prefix = format!("{}/", request);
        let before = selected.len();
        for (category, files) in all {
            if category == request || category.starts_with(&prefix) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                request,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

struct Style {
    no_color: bool,
}

impl Style {
    fn paint(&self, text: &str, code: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn pass(&self) -> String {
        self.paint("PASS", "32")
    }

    fn fail(&self) -> String {
        self.paint("FAIL", "31")
    }
}

/// Run all `.test.md` files under `path` (or a single file).
/// Returns the exit code: 0 when everything passes, 1 otherwise.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { no_color };

    let groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no .test.md files found in {}", path.display());
            return 1;
        }
        let selected = select_categories(&all, categories);
        if selected.is_empty() {
            eprintln!("no matching categories found");
            return 1;
        }
        selected
            .into_iter()
            .map(|(category, files)| (category.to_string(), files.to_vec()))
            .collect()
    };

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &groups {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", style.paint(category_label(category), "1"));
        }
        for file in files {
            let result = run_single_test(file);
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", style.fail(), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", style.paint("ok", "32"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            style.paint("FAILED", "31"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    #[test]
    fn frontmatter_and_source_are_split() {
        let content = "---\ndescription = \"a heading\"\nexpect_contains = [\"<h1>\"]\n[[expect_warnings]]\ncontains = \"code\"\nline = 2\n---\n# Title\n";
        let (fixture, source) = parse_test_file(content).unwrap();
        assert_eq!(fixture.description.as_deref(), Some("a heading"));
        assert_eq!(fixture.expect_contains, vec!["<h1>".to_string()]);
        let warnings = fixture.expect_warnings.unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, Some(2));
        assert_eq!(source, "# Title\n");
    }

    #[test]
    fn crlf_frontmatter() {
        let content = "\u{feff}---\r\ntitle = \"T\"\r\n---\r\nbody\r\n";
        let (fixture, source) = parse_test_file(content).unwrap();
        assert_eq!(fixture.title.as_deref(), Some("T"));
        assert_eq!(source, "body\r\n");
    }

    #[test]
    fn malformed_frontmatter() {
        assert!(parse_test_file("# no frontmatter\n").is_err());
        assert!(parse_test_file("---\ntitle = \"T\"\n").is_err());
        assert!(parse_test_file("---\nbogus = 1\n---\n").is_err());
    }

    #[test]
    fn output_checks() {
        let fixture = Fixture {
            expect_contains: vec!["<p>".into(), "<h2>".into()],
            ..Fixture::default()
        };
        assert!(check_output(&fixture, "<p>").unwrap().contains("<h2>"));
        assert!(check_output(&fixture, "<p><h2>").is_none());
    }

    #[test]
    fn warning_checks() {
        let warning = MarkupError::warning("unterminated inline code span", 3, 10..12, 0);
        let expected = |line| ExpectedWarning {
            contains: "inline code".into(),
            line,
        };
        assert!(check_warnings(&[warning.clone()], &[expected(Some(3))]).is_none());
        assert!(check_warnings(&[warning.clone()], &[expected(Some(4))]).is_some());
        assert!(check_warnings(&[warning], &[]).is_some());
        assert!(check_warnings(&[], &[]).is_none());
    }

    #[test]
    fn fixtures_are_grouped_by_folder() {
        let categories = discover_categorized(&fixtures_dir());
        assert!(categories.contains_key("blocks"));
        assert!(categories.contains_key("inline"));
        assert!(categories.contains_key("document"));
    }

    #[test]
    fn every_fixture_passes() {
        let dir = fixtures_dir();
        for files in discover_categorized(&dir).values() {
            for file in files {
                let result = run_single_test(file);
                if let TestOutcome::Fail(reason) = &result.outcome {
                    panic!("{} failed:\n{}", file.display(), reason);
                }
            }
        }
    }
}
