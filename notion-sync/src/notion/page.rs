use notion_types::{
    Block, Cover, CreatePageBody, MultiSelectProperty, PageProperties, Parent, SelectOption,
    TitleProperty,
};

/// Everything needed to create one Notion page from a note. Built per sync
/// attempt and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct SyncRequest {
    /// Target database id.
    pub container_id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Tags are only exported when this is set.
    pub allow_tags: bool,
    pub blocks: Vec<Block>,
    pub cover_url: Option<String>,
}

impl SyncRequest {
    /// Tags in Notion's multi-select shape. Empty unless tag export is on.
    pub fn remote_tags(&self) -> Vec<SelectOption> {
        if !self.allow_tags {
            return Vec::new();
        }
        self.tags
            .iter()
            .map(|tag| SelectOption { name: tag.clone() })
            .collect()
    }

    /// Body for `POST /v1/pages` carrying at most `max_children` blocks.
    pub fn create_body(&self, max_children: usize) -> CreatePageBody {
        CreatePageBody {
            parent: Parent {
                database_id: self.container_id.clone(),
            },
            properties: PageProperties {
                name: TitleProperty::plain(&self.title),
                tags: MultiSelectProperty {
                    multi_select: self.remote_tags(),
                },
            },
            children: self.blocks.iter().take(max_children).cloned().collect(),
            cover: self.cover_url.as_deref().map(Cover::external),
        }
    }
}

/// A page in the remote store, known locally only by id and link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(allow_tags: bool) -> SyncRequest {
        SyncRequest {
            container_id: "db1".to_string(),
            title: "Notes".to_string(),
            tags: vec!["rust".to_string(), "sync".to_string()],
            allow_tags,
            blocks: vec![Block::paragraph("a"), Block::paragraph("b")],
            cover_url: None,
        }
    }

    #[test]
    fn test_tags_gated_by_flag() {
        assert!(request(false).remote_tags().is_empty());

        let names: Vec<String> = request(true).remote_tags().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["rust", "sync"]);
    }

    #[test]
    fn test_disallowed_tags_serialize_as_empty_list() {
        let value = serde_json::to_value(request(false).create_body(100)).unwrap();
        assert_eq!(value["properties"]["Tags"]["multi_select"], serde_json::json!([]));
    }

    #[test]
    fn test_create_body_limits_children() {
        let body = request(false).create_body(1);
        assert_eq!(body.children.len(), 1);
        assert_eq!(body.properties.name.title[0].text.content, "Notes");
    }

    #[test]
    fn test_cover_only_when_set() {
        let mut req = request(false);
        assert!(req.create_body(100).cover.is_none());

        req.cover_url = Some("https://img/banner.png".to_string());
        let cover = req.create_body(100).cover.unwrap();
        assert_eq!(cover.external.url, "https://img/banner.png");
    }
}
