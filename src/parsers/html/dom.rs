use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: String) -> RcDom {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .unwrap()
}

/// 将 DOM 序列化回 HTML 字节
pub fn serialize_document(dom: RcDom) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    let document: SerializableHandle = dom.document.clone().into();
    let _ = serialize(&mut buf, &document, SerializeOpts::default());
    buf
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点标签名
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性值，值为 None 时删除该属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::{namespace_url, ns, LocalName};

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    let _ = &attrs_mut[i].value.clear();
                    let _ = &attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            // Add new attribute (since originally the target node didn't have it)
            if let Some(attr_value) = attr_value.clone() {
                let name = QualName::new(None, ns!(), LocalName::from(attr_name));

                attrs_mut.push(Attribute {
                    name,
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element_named(node: &Handle, name: &str) -> Option<Handle> {
        if get_node_name(node) == Some(name) {
            return Some(node.clone());
        }
        for child in node.children.borrow().iter() {
            if let Some(found) = first_element_named(child, name) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn test_roundtrip_and_attrs() {
        let dom = html_to_dom(
            br#"<html><body><img src="/a.png" loading="lazy"></body></html>"#,
            "utf-8".to_string(),
        );
        let img = first_element_named(&dom.document, "img").unwrap();

        assert_eq!(get_node_attr(&img, "src").as_deref(), Some("/a.png"));
        set_node_attr(&img, "loading", Some("eager".to_string()));
        assert_eq!(get_node_attr(&img, "loading").as_deref(), Some("eager"));

        let html = String::from_utf8(serialize_document(dom)).unwrap();
        assert!(html.contains(r#"loading="eager""#));
    }

    #[test]
    fn test_html_to_dom_unknown_encoding_falls_back() {
        let dom = html_to_dom(b"<html><body>ok</body></html>", "no-such-enc".to_string());
        assert!(first_element_named(&dom.document, "body").is_some());
    }
}
