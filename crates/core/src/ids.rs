//! Per-category string identifiers for rooms, creatures and items.
//! A fresh allocator always issues the same sequence, which is what lets a
//! replayed session address entities by the ids recorded in its journal.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdCategory {
    Room,
    Creature,
    Item,
}

impl IdCategory {
    fn prefix(self) -> char {
        match self {
            Self::Room => 'r',
            Self::Creature => 'c',
            Self::Item => 'i',
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    rooms: u32,
    creatures: u32,
    items: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, category: IdCategory) -> String {
        let counter = match category {
            IdCategory::Room => &mut self.rooms,
            IdCategory::Creature => &mut self.creatures,
            IdCategory::Item => &mut self.items,
        };
        let id = format!("{}{}", category.prefix(), *counter);
        *counter += 1;
        id
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
