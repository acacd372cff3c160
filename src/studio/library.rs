use std::collections::{BTreeMap, VecDeque};

use crate::brand::BrandId;
use crate::scene::GeneratedItem;

/// Finalized items, newest first.
#[derive(Debug, Default)]
pub struct Library {
    items: VecDeque<GeneratedItem>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: GeneratedItem) {
        self.items.push_front(item);
    }

    pub fn items(&self) -> impl Iterator<Item = &GeneratedItem> {
        self.items.iter()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn latest(&self) -> Option<&GeneratedItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Brand, then channel id, then items in library order.
    pub fn grouped(&self) -> BTreeMap<BrandId, BTreeMap<String, Vec<&GeneratedItem>>> {
        let mut groups: BTreeMap<BrandId, BTreeMap<String, Vec<&GeneratedItem>>> = BTreeMap::new();
        for item in &self.items {
            groups
                .entry(item.brand())
                .or_default()
                .entry(item.channel_id().to_string())
                .or_default()
                .push(item);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ContentScore, ContentType, ScriptScene};

    fn item(brand: BrandId, channel: &str, line: &str) -> GeneratedItem {
        GeneratedItem::new(
            ContentType::Sticker,
            vec![ScriptScene::new(1, line, "cue")],
            ContentScore {
                score: 70,
                feedback: String::new(),
                suggestions: vec![],
            },
            brand,
            channel,
        )
    }

    #[test]
    fn newest_item_comes_first() {
        let mut library = Library::new();
        library.push(item(BrandId::Oniiz, "1", "first"));
        library.push(item(BrandId::Oniiz, "1", "second"));
        let lines: Vec<&str> = library.items().map(|i| i.scenes()[0].line.as_str()).collect();
        assert_eq!(lines, vec!["second", "first"]);
        assert_eq!(library.latest().unwrap().scenes()[0].line, "second");
    }

    #[test]
    fn groups_by_brand_then_channel() {
        let mut library = Library::new();
        library.push(item(BrandId::Oniiz, "1", "a"));
        library.push(item(BrandId::V2joy, "2", "b"));
        library.push(item(BrandId::Oniiz, "1", "c"));
        library.push(item(BrandId::Oniiz, "7", "d"));

        let groups = library.grouped();
        assert_eq!(groups.len(), 2);
        let oniiz = &groups[&BrandId::Oniiz];
        assert_eq!(oniiz["1"].len(), 2);
        assert_eq!(oniiz["1"][0].scenes()[0].line, "c");
        assert_eq!(oniiz["7"].len(), 1);
        assert_eq!(groups[&BrandId::V2joy]["2"].len(), 1);
    }
}
