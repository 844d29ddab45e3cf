//! The note list shown beside the progress card.

/// Ordered short notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteList {
    notes: Vec<String>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note. Blank text is ignored and returns `false`.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.notes.push(text.to_string());
        true
    }

    /// Remove the note at index.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.notes.len() {
            Some(self.notes.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.notes.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.notes
    }
}

impl From<Vec<String>> for NoteList {
    fn from(notes: Vec<String>) -> Self {
        let mut list = Self::new();
        for note in &notes {
            list.add(note);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut notes = NoteList::new();
        assert!(notes.add("  finish taxes "));
        assert!(!notes.add("   "));
        assert!(!notes.add(""));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.get(0), Some("finish taxes"));
    }

    #[test]
    fn test_remove() {
        let mut notes = NoteList::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(notes.remove(1).as_deref(), Some("b"));
        assert_eq!(notes.remove(5), None);
        assert_eq!(notes.iter().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_from_drops_blank_entries() {
        let notes = NoteList::from(vec!["".to_string(), " keep ".to_string()]);
        assert_eq!(notes.as_slice(), &["keep".to_string()]);
        assert!(!notes.is_empty());
    }
}
