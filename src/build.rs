use std::collections::HashMap;
use std::error::Error;
use std::fs::{self};
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info};
use regex::{Captures, Regex};
use tera::{Context, Tera};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{Documents, Manifest};
use crate::path_util::SiteDir;
use crate::prepare::{PageMeta, prepare};
use crate::search::SearchBar;

const DEFAULT_TEMPLATE: &str = include_str!("../assets/index.html");

static ASSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(img|link|script)([^>]*?)(src|href)="(/[^"?]+)"([^>]*?)>"#).unwrap()
});

pub fn run_build(dir: SiteDir, minify: bool) -> Result<(), Box<dyn Error>> {
    info!("Reading manifest");
    let manifest = Manifest::load(&dir)?;
    let output_path = dir.join(&manifest.output_dir);
    fs::create_dir_all(&output_path)?;

    let documents = Documents::load(&dir.join(&manifest.content_dir))?;

    info!("Preparing navigation data");
    let data = prepare(&documents);
    debug!("{:?}", &data.site);
    info!(
        "{} categories, {} links, {} search engines",
        data.navigation.navigation_items.len(),
        data.navigation.link_count(),
        data.engines.len()
    );

    let scss_path = dir.scss_path();
    if scss_path.exists() {
        info!("Compiling SCSS");
        let css = grass::from_path(scss_path, &grass::Options::default())?;
        fs::write(output_path.join("style.css"), css)?;
    } else {
        info!("No SCSS found, skipping");
    }

    info!("Copying static assets");
    let static_path = dir.static_dir();
    if static_path.exists() {
        copy_assets(&static_path, &output_path)?;
    }
    let asset_hashes = collect_asset_hashes(&output_path, &output_path)?;
    debug!("{:?}", &asset_hashes);

    info!("Initializing Tera");
    let tera = load_templates(&dir, &manifest.template)?;

    let search = SearchBar::new(data.engines.clone());
    let mut context = Context::new();
    context.insert("asset_hashes", &asset_hashes);
    context.insert("has_stylesheet", &asset_hashes.contains_key("/style.css"));
    context.insert("meta", &PageMeta::from_site(&data.site));
    context.insert("site", &data.site);
    context.insert("navigation", &data.navigation.navigation_items);
    context.insert("search_visible", &search.is_visible());
    context.insert("engines", &search.chips());

    info!("Rendering {}", manifest.template);
    let rendered =
        bust_asset_urls(&tera.render(&manifest.template, &context)?, &asset_hashes).into_bytes();

    let minified = if minify || manifest.minify {
        debug!("Minifying");
        let cfg = minify_html::Cfg::new();
        minify_html::minify(&rendered, &cfg)
    } else {
        rendered
    };

    let out_file = output_path.join("index.html");
    debug!("Writing file {}", out_file.display());
    fs::write(out_file, minified)?;

    info!("Build complete");
    Ok(())
}

/// Removes the output directory.
pub fn run_clean(dir: SiteDir) -> Result<(), Box<dyn Error>> {
    let manifest = Manifest::load(&dir)?;
    let output_path = dir.join(&manifest.output_dir);
    info!("Removing directory: {}", output_path.display());
    fs::remove_dir_all(&output_path)?;
    Ok(())
}

/// Project templates override the built in page.
fn load_templates(dir: &SiteDir, name: &str) -> Result<Tera, Box<dyn Error>> {
    let mut tera = if dir.templates_dir().exists() {
        Tera::new(
            dir.templates_glob()
                .to_str()
                .ok_or("template path is not valid UTF-8")?
        )?
    } else {
        Tera::default()
    };
    if !tera.get_template_names().any(|t| t == name) {
        debug!("Using built in template for {}", name);
        tera.add_raw_template(name, DEFAULT_TEMPLATE)?;
    }
    Ok(tera)
}

fn hash_file(path: &Path) -> Result<String, Box<dyn Error>> {
    let contents = fs::read(path)?;
    Ok(format!("{:x}", xxh3_64(&contents)))
}

fn collect_asset_hashes(
    dir: &Path,
    base: &Path
) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let mut hashes = HashMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            hashes.extend(collect_asset_hashes(&path, base)?);
        } else if path.extension().and_then(|s| s.to_str()) != Some("html") {
            let rel = path.strip_prefix(base)?;
            let url = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
            hashes.insert(url, hash_file(&path)?);
        }
    }
    Ok(hashes)
}

/// Appends `?v=<hash>` to local asset references.
fn bust_asset_urls(html: &str, asset_hashes: &HashMap<String, String>) -> String {
    ASSET_URL
        .replace_all(html, |caps: &Captures| match asset_hashes.get(&caps[4]) {
            Some(hash) => format!(
                r#"<{}{}{}="{}?v={}"{}>"#,
                &caps[1], &caps[2], &caps[3], &caps[4], hash, &caps[5]
            ),
            None => caps[0].to_string()
        })
        .into_owned()
}

fn copy_assets(src: &Path, dst: &Path) -> Result<(), Box<dyn Error>> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let dest = dst.join(entry.file_name());
        if path.is_dir() {
            fs::create_dir_all(&dest)?;
            copy_assets(&path, &dest)?;
        } else {
            fs::copy(&path, &dest)?;
        }
    }
    Ok(())
}
