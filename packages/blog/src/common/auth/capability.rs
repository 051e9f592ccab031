use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Capabilities the blog subsystem depends on
///
/// Names match the grants handed out by the host application's role system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// See unpublished posts in listings and single fetches
    AccessBlogsUnpublished,

    CreateBlog,
    UpdateBlog,
    DeleteBlog,

    CreateBlogPost,
    /// Fetch a single post
    FindBlogPost,
    /// Edit, publish and unpublish posts
    UpdateBlogPost,
    DeleteBlogPost,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::AccessBlogsUnpublished,
        Capability::CreateBlog,
        Capability::UpdateBlog,
        Capability::DeleteBlog,
        Capability::CreateBlogPost,
        Capability::FindBlogPost,
        Capability::UpdateBlogPost,
        Capability::DeleteBlogPost,
    ];

    /// Grant name used by the role system
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AccessBlogsUnpublished => "access_blogs_unpublished",
            Capability::CreateBlog => "create_blog",
            Capability::UpdateBlog => "update_blog",
            Capability::DeleteBlog => "delete_blog",
            Capability::CreateBlogPost => "create_blog-post",
            Capability::FindBlogPost => "find_blog-post",
            Capability::UpdateBlogPost => "update_blog-post",
            Capability::DeleteBlogPost => "delete_blog-post",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown capability: {}", s))
    }
}

/// Policy interface answering "can the caller do X?"
pub trait CapabilityPolicy: Send + Sync {
    fn can(&self, capability: Capability) -> bool;
}

/// Set-backed policy built from the caller's granted capability names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantedCapabilities {
    granted: HashSet<Capability>,
}

impl GrantedCapabilities {
    /// A caller with no grants (anonymous visitor)
    pub fn none() -> Self {
        Self::default()
    }

    /// A caller holding every capability
    pub fn all() -> Self {
        Self::new(Capability::ALL)
    }

    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: capabilities.into_iter().collect(),
        }
    }

    /// Build from grant names; names this crate does not know are skipped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let granted = names
            .into_iter()
            .filter_map(|name| match name.as_ref().parse::<Capability>() {
                Ok(capability) => Some(capability),
                Err(_) => {
                    tracing::debug!(name = name.as_ref(), "Ignoring unknown capability grant");
                    None
                }
            })
            .collect();
        Self { granted }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.granted.insert(capability);
        self
    }
}

impl CapabilityPolicy for GrantedCapabilities {
    fn can(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}
