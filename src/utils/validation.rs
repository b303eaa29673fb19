use anyhow::{anyhow, Result};

pub fn validate_material_title(title: &str) -> Result<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(anyhow!("Material title cannot be empty"));
    }

    if title.len() > 255 {
        return Err(anyhow!("Material title cannot be longer than 255 characters"));
    }

    if title.contains('\n') || title.contains('\r') {
        return Err(anyhow!("Material title cannot contain line breaks"));
    }

    Ok(())
}

pub fn validate_material_url(url: &str) -> Result<()> {
    let url = url.trim();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(anyhow!("Material URL must start with http:// or https://"));
    }

    if url.len() > 1024 {
        return Err(anyhow!("Material URL cannot be longer than 1024 characters"));
    }

    if url.contains(char::is_whitespace) {
        return Err(anyhow!("Material URL cannot contain whitespace"));
    }

    Ok(())
}
