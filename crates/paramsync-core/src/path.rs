/// Root segment every parameter path hangs off
pub const DEFAULT_ROOT: &str = "/torc";

const SEPARATOR: char = '/';

/// Components recovered from a full parameter path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub environment: String,
    pub service: String,
    /// Everything below the service segment, `None` for a bare service path
    pub name: Option<String>,
}

/// Builds and parses `<root>/<environment>/<service>[/<name>]` paths.
///
/// Built paths double as cache keys, so `build_path` must stay a pure
/// function of its inputs. Parsing is positional: the environment sits at
/// the segment right after the root and the service at the one after that,
/// both derived from the root's depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    root: String,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl PathBuilder {
    /// Create a builder for the given root.
    ///
    /// The root is normalized to a leading `/` and no trailing `/`, so
    /// `torc/`, `/torc/` and `/torc` all build the same paths.
    pub fn new(root: impl AsRef<str>) -> Self {
        let trimmed = root.as_ref().trim_matches(SEPARATOR);
        let root = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}{}", SEPARATOR, trimmed)
        };
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Path of the root itself, usable as a recursive listing scope
    pub fn root_scope(&self) -> String {
        if self.root.is_empty() {
            SEPARATOR.to_string()
        } else {
            self.root.clone()
        }
    }

    /// Number of `/`-split segments the root occupies (including the
    /// leading empty segment)
    pub fn root_depth(&self) -> usize {
        self.root.split(SEPARATOR).count()
    }

    /// Segment index of the environment in a split path
    pub fn environment_index(&self) -> usize {
        self.root_depth()
    }

    /// Segment index of the service in a split path
    pub fn service_index(&self) -> usize {
        self.environment_index() + 1
    }

    /// Listing scope holding every service of one environment
    pub fn environment_path(&self, environment: &str) -> String {
        format!("{}{}{}", self.root, SEPARATOR, environment)
    }

    pub fn build_path(&self, environment: &str, service: &str, name: Option<&str>) -> String {
        let mut path = format!("{}{}{}{}{}", self.root, SEPARATOR, environment, SEPARATOR, service);
        if let Some(name) = name {
            path.push(SEPARATOR);
            path.push_str(name);
        }
        path
    }

    /// Positional inverse of [`build_path`](Self::build_path).
    ///
    /// Returns `None` for paths outside the root or too short to carry both
    /// an environment and a service.
    pub fn parse(&self, path: &str) -> Option<ParsedPath> {
        let below_root = path.strip_prefix(self.root.as_str())?;
        if !below_root.starts_with(SEPARATOR) {
            return None;
        }

        let segments: Vec<&str> = path.split(SEPARATOR).collect();
        let environment = segments.get(self.environment_index())?;
        let service = segments.get(self.service_index())?;
        if environment.is_empty() || service.is_empty() {
            return None;
        }

        let rest = &segments[self.service_index() + 1..];
        let name = if rest.is_empty() || rest.iter().all(|s| s.is_empty()) {
            None
        } else {
            Some(rest.join("/"))
        };

        Some(ParsedPath {
            environment: environment.to_string(),
            service: service.to_string(),
            name,
        })
    }
}
