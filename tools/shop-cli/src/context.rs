//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use shop_cache::{Cache, FileStore};
use shop_commerce::auth::SessionStore;
use shop_commerce::cart::CartStore;
use shop_commerce::config::ShopConfig;
use shop_commerce::currency::CurrencyStore;
use shop_commerce::language::LanguageStore;
use shop_commerce::wishlist::WishlistStore;
use shop_data::{GraphqlCatalog, WordPressAuth};
use tracing::debug;

use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Shop configuration.
    pub config: ShopConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Directory of the loaded config file, or the working directory.
    pub root: PathBuf,
    /// Loaded config file, if any.
    pub config_path: Option<PathBuf>,
}

/// Client state stores over the shared storage file.
pub struct Stores {
    pub cart: CartStore,
    pub currency: CurrencyStore,
    pub session: SessionStore,
    pub wishlist: WishlistStore,
    pub language: LanguageStore,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (ShopConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd, &output) {
                Some((config, path)) => (config, Some(path)),
                None => (ShopConfig::default(), None),
            }
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        Ok(Self {
            config,
            output,
            cwd,
            root,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path, output: &Output) -> Option<(ShopConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match ShopConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => output.warn(&format!("Ignoring {:#}", e)),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// The storage file backing all client state.
    pub fn storage_path(&self) -> PathBuf {
        match &self.config.storage.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.root.join(path),
            None => self.root.join(".shop").join("storage.json"),
        }
    }

    /// Open the storage file.
    pub fn cache(&self) -> Result<Cache> {
        let path = self.storage_path();
        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open storage: {}", path.display()))?;
        debug!(path = %path.display(), "Opened storage");
        Ok(Cache::new(Arc::new(store)))
    }

    /// Open every client store.
    pub fn stores(&self) -> Result<Stores> {
        let cache = self.cache()?;
        let rates = self.config.exchange_rates()?;
        let default_currency = self.config.default_currency()?;

        Ok(Stores {
            cart: CartStore::open(cache.clone()),
            currency: CurrencyStore::open(cache.clone(), rates, default_currency),
            session: SessionStore::open(cache.clone()),
            wishlist: WishlistStore::open(cache.clone()),
            language: LanguageStore::open(cache),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.api.timeout_secs)
    }

    /// GraphQL catalog, content and order service.
    pub fn catalog(&self) -> Result<Arc<GraphqlCatalog>> {
        let catalog = GraphqlCatalog::connect(&self.config.api.graphql_url, self.timeout())
            .context("Failed to create HTTP client")?;
        self.output
            .debug(&format!("GraphQL endpoint: {}", self.config.api.graphql_url));
        Ok(Arc::new(catalog))
    }

    /// Sign-in service.
    pub fn auth(&self) -> Result<WordPressAuth> {
        WordPressAuth::new(&self.config.api.auth_url, self.timeout())
            .context("Failed to create HTTP client")
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &Path, config: ShopConfig, config_path: Option<PathBuf>) -> Context {
        Context {
            config,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
            root: dir.to_path_buf(),
            config_path,
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".shop.toml"), "[catalog]\npage_size = 7\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = Context::find_config(&nested, &Output::new(false, true)).unwrap();
        assert_eq!(config.catalog.page_size, 7);
        assert_eq!(path, dir.path().join(".shop.toml"));
    }

    #[test]
    fn test_storage_path_defaults_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path(), ShopConfig::default(), None);
        assert_eq!(
            ctx.storage_path(),
            dir.path().join(".shop").join("storage.json")
        );

        let mut config = ShopConfig::default();
        config.storage.path = Some(PathBuf::from("state/cart.json"));
        let ctx = context_in(dir.path(), config, None);
        assert_eq!(ctx.storage_path(), dir.path().join("state/cart.json"));
    }

    #[test]
    fn test_stores_share_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path(), ShopConfig::default(), None);

        let stores = ctx.stores().unwrap();
        stores.wishlist.add("p1".into());
        drop(stores);

        let stores = ctx.stores().unwrap();
        assert!(stores.wishlist.contains(&"p1".into()));
        assert!(ctx.storage_path().exists());
    }
}
