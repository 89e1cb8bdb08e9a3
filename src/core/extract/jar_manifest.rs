use std::collections::HashMap;

/// Main section of a `META-INF/MANIFEST.MF`.
///
/// `Key: Value` lines up to the first blank line; a line starting with a
/// single space continues the previous value.
#[derive(Debug, Default)]
pub struct JarManifest {
    attributes: HashMap<String, String>,
}

impl JarManifest {
    pub fn parse(text: &str) -> Self {
        let mut attributes: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;

        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some(value) = current.as_ref().and_then(|k| attributes.get_mut(k)) {
                    value.push_str(continuation);
                }
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim().to_string();
                attributes.insert(key.clone(), value.trim().to_string());
                current = Some(key);
            }
        }

        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn implementation_version(&self) -> Option<&str> {
        self.get("Implementation-Version")
    }
}
