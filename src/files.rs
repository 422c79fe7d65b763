use glob::{MatchOptions, Pattern};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use crate::error::{Result, TallyError};

const LANGUAGES: &[(&str, &[&str])] = &[
    ("assembly",            &[".asm", ".a51", ".inc", ".nasm", ".s", ".S"]),
    ("batchfile",           &[".bat", ".cmd"]),
    ("c",                   &[".c", ".cats", ".h", ".idc"]),
    ("c#",                  &[".cs", ".cake", ".csx"]),
    ("c++",                 &[".cpp", ".c++", ".cc", ".cp", ".cxx", ".h", ".h++", ".hh", ".hpp", ".hxx", ".inl", ".ipp", ".tcc", ".tpp"]),
    ("clojure",             &[".clj", ".cljc", ".cljs", ".cljx", ".edn"]),
    ("cmake",               &[".cmake", ".cmake.in"]),
    ("coffeescript",        &[".coffee", ".cake", ".cjsx", ".iced"]),
    ("common lisp",         &[".lisp", ".asd", ".cl", ".l", ".lsp", ".ny"]),
    ("crystal",             &[".cr"]),
    ("css",                 &[".css"]),
    ("cuda",                &[".cu", ".cuh"]),
    ("d",                   &[".d", ".di"]),
    ("dart",                &[".dart"]),
    ("elixir",              &[".ex", ".exs"]),
    ("elm",                 &[".elm"]),
    ("emacs lisp",          &[".el", ".emacs"]),
    ("erlang",              &[".erl", ".escript", ".hrl", ".xrl", ".yrl"]),
    ("f#",                  &[".fs", ".fsi", ".fsx"]),
    ("fortran",             &[".f90", ".f", ".f03", ".f08", ".f77", ".f95", ".for", ".fpp"]),
    ("go",                  &[".go"]),
    ("graphql",             &[".graphql", ".gql"]),
    ("groovy",              &[".groovy", ".grt", ".gtpl", ".gvy"]),
    ("haskell",             &[".hs", ".hsc", ".lhs"]),
    ("hcl",                 &[".hcl", ".tf", ".tfvars"]),
    ("html",                &[".html", ".htm", ".html.hl", ".xht", ".xhtml"]),
    ("java",                &[".java"]),
    ("javascript",          &[".js", ".cjs", ".es6", ".jsx", ".mjs"]),
    ("json",                &[".json", ".jsonc", ".json5"]),
    ("julia",               &[".jl"]),
    ("kotlin",              &[".kt", ".ktm", ".kts"]),
    ("less",                &[".less"]),
    ("lua",                 &[".lua", ".nse", ".rbxs", ".wlua"]),
    ("markdown",            &[".md", ".markdown", ".mdown", ".mkd", ".mkdn"]),
    ("matlab",              &[".matlab", ".m"]),
    ("nim",                 &[".nim", ".nimble"]),
    ("nix",                 &[".nix"]),
    ("objective-c",         &[".m", ".h"]),
    ("objective-c++",       &[".mm"]),
    ("ocaml",               &[".ml", ".eliom", ".mli", ".mll", ".mly"]),
    ("pascal",              &[".pas", ".dfm", ".dpr", ".lpr", ".pp"]),
    ("perl",                &[".pl", ".al", ".cgi", ".perl", ".ph", ".plx", ".pm", ".psgi", ".t"]),
    ("php",                 &[".php", ".php3", ".php4", ".php5", ".phps", ".phpt", ".phtml"]),
    ("powershell",          &[".ps1", ".psd1", ".psm1"]),
    ("protocol buffer",     &[".proto"]),
    ("purescript",          &[".purs"]),
    ("python",              &[".py", ".gyp", ".pyi", ".pyw", ".pyx", ".pxd", ".wsgi"]),
    ("r",                   &[".r", ".R", ".rd", ".rsx"]),
    ("ruby",                &[".rb", ".builder", ".gemspec", ".jbuilder", ".rake", ".rbw", ".ru"]),
    ("rust",                &[".rs"]),
    ("sass",                &[".sass"]),
    ("scala",               &[".scala", ".kojo", ".sbt", ".sc"]),
    ("scheme",              &[".scm", ".sld", ".sls", ".sps", ".ss"]),
    ("scss",                &[".scss"]),
    ("shell",               &[".sh", ".bash", ".bats", ".command", ".ksh", ".zsh"]),
    ("solidity",            &[".sol"]),
    ("sql",                 &[".sql", ".ddl", ".prc", ".tab", ".udf", ".viw"]),
    ("svelte",              &[".svelte"]),
    ("swift",               &[".swift"]),
    ("tcl",                 &[".tcl", ".tm"]),
    ("tex",                 &[".tex", ".bbx", ".cbx", ".cls", ".dtx", ".ins", ".ltx", ".sty"]),
    ("toml",                &[".toml"]),
    ("typescript",          &[".ts", ".cts", ".mts", ".tsx"]),
    ("vim script",          &[".vim", ".vba", ".vimrc", ".vmb"]),
    ("visual basic .net",   &[".vb", ".vbhtml"]),
    ("vue",                 &[".vue"]),
    ("xml",                 &[".xml", ".xsd", ".xsl", ".xslt", ".plist", ".svg"]),
    ("yaml",                &[".yml", ".yaml"]),
    ("zig",                 &[".zig"]),
];

static LANGUAGE_EXTENSIONS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| LANGUAGES.iter().copied().collect());

/// File selection settings. Empty lists disable the matching stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileFilter {
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict: Vec<String>,
}

/// Keeps the files selected by `filter`, in input order. Empty entries are skipped.
///
/// With restrict patterns present, a file that matches none of them is
/// dropped even when no exclude pattern matched it either.
pub fn filter_files(files: &[String], filter: &FileFilter) -> Result<Vec<String>> {
    let allowed = allowed_extensions(filter);
    let exclude = compile_all(&filter.exclude)?;
    let restrict = compile_all(&filter.restrict)?;

    Ok(files
        .iter()
        .filter(|f| !f.is_empty())
        .filter(|f| allowed.as_ref().map_or(true, |set| set.contains(extension(f))))
        .filter(|f| !exclude.iter().any(|p| matches(p, f)))
        .filter(|f| restrict.is_empty() || restrict.iter().any(|p| matches(p, f)))
        .cloned()
        .collect())
}

/// `None` when neither extensions nor languages were requested.
fn allowed_extensions(filter: &FileFilter) -> Option<HashSet<String>> {
    if filter.extensions.is_empty() && filter.languages.is_empty() {
        return None;
    }

    let mut set: HashSet<String> = filter
        .languages
        .iter()
        .filter_map(|lang| LANGUAGE_EXTENSIONS.get(lang.to_lowercase().as_str()))
        .flat_map(|exts| exts.iter().map(|e| e.to_string()))
        .collect();

    for ext in &filter.extensions {
        let ext = ext.trim();
        if ext.is_empty() { continue; }
        set.insert(if ext.starts_with('.') { ext.to_string() } else { format!(".{ext}") });
    }
    Some(set)
}

/// Extension of the last path component including the dot, or "".
fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map_or("", |i| &name[i..])
}

/// `*` and `?` stop at `/`, so `vendor/*` covers only the top level of
/// `vendor`. `**` as a whole component crosses directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile_all(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns.iter().map(|p| compile_glob(p)).collect()
}

/// Compiles a shell glob matched against the whole repository-relative path.
pub fn compile_glob(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| TallyError::Config(format!("invalid glob pattern {pattern:?}: {e}")))
}

fn matches(pattern: &Pattern, path: &str) -> bool {
    pattern.matches_with(path, MATCH_OPTIONS)
}
