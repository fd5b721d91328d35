//! 属性内嵌 JSON 资产清单重写
//!
//! 某些页面把资产清单以百分号编码的 JSON 塞进 `content="..."` 属性。
//! 这里逐个解码、解析、重写 `assets.video.*`、`assets.poster`、
//! `assets.image.*.src` 中的相对引用，再编码写回。
//! 解析失败只放弃该条属性，文档其余部分继续处理。

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::utils::url::{encode_uri_component, Url};

/// 重写文档中所有 `content="..."` 属性里的资产清单
pub fn rewrite_json_assets(data: &str, base_url: &Url) -> String {
    let content_attr = Regex::new(r#"content="([^"]+)""#).unwrap();

    content_attr
        .replace_all(data, |caps: &Captures| {
            match rewrite_manifest(&caps[1], base_url) {
                Some(encoded) => format!(r#"content="{}""#, encoded),
                None => {
                    tracing::debug!("content attribute is not a JSON manifest, left as-is");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// 解码、重写并重新编码单个清单；解码或解析失败返回 None
fn rewrite_manifest(raw: &str, base_url: &Url) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let mut manifest: Value = serde_json::from_str(&decoded).ok()?;

    if let Some(assets) = manifest.get_mut("assets").and_then(Value::as_object_mut) {
        if let Some(video) = assets.get_mut("video").and_then(Value::as_object_mut) {
            for variant in video.values_mut() {
                if let Some(fields) = variant.as_object_mut() {
                    rewrite_variant_urls(fields, base_url);
                }
            }
        }

        if let Some(poster) = assets.get_mut("poster").and_then(Value::as_object_mut) {
            rewrite_variant_urls(poster, base_url);
        }

        if let Some(image) = assets.get_mut("image").and_then(Value::as_object_mut) {
            for variant in image.values_mut() {
                let Some(src) = variant.get_mut("src") else {
                    continue;
                };
                if let Some(reference) = src.as_str() {
                    if !reference.starts_with("http") {
                        if let Ok(absolute_url) = base_url.join(reference) {
                            *src = Value::String(absolute_url.to_string());
                        }
                    }
                }
            }
        }
    }

    let serialized = serde_json::to_string(&manifest).ok()?;
    Some(encode_uri_component(&serialized))
}

/// 重写一个资产变体中所有非绝对、非 data: 的字符串字段
fn rewrite_variant_urls(fields: &mut Map<String, Value>, base_url: &Url) {
    for value in fields.values_mut() {
        if let Some(reference) = value.as_str() {
            if !reference.starts_with("data:") && !reference.starts_with("http") {
                if let Ok(absolute_url) = base_url.join(reference) {
                    *value = Value::String(absolute_url.to_string());
                }
            }
        }
    }
}
