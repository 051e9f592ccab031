use super::models::{Blog, BlogPost};

/// Builds absolute permanent links from the configured origin.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    app_origin: String,
}

impl LinkConfig {
    pub fn new(app_origin: impl Into<String>) -> Self {
        let app_origin = app_origin.into();
        Self {
            app_origin: app_origin.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, path: String) -> Option<String> {
        if path.is_empty() {
            None
        } else {
            Some(format!("{}{}", self.app_origin, path))
        }
    }

    pub fn hydrate_blog(&self, blog: &mut Blog) {
        blog.link_permanent = self.absolute(blog.path());
    }

    pub fn hydrate_post(&self, post: &mut BlogPost) {
        post.link_permanent = self.absolute(post.path());
    }
}
