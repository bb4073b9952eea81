//! [`Locale`] definitions.
//!
//! All the human-readable labels the pipeline produces come from the
//! [`Locale`] it is constructed with.

use common::define_kind;

use crate::domain::{
    bulk,
    ticket::{Category, Priority, Status},
};

define_kind! {
    #[doc = "Language of the labels."]
    enum Language {
        #[doc = "Turkish."]
        Tr = 1,

        #[doc = "English."]
        En = 2,
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Tr
    }
}

/// Label tables of a single [`Language`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Locale {
    /// [`Language`] of this [`Locale`].
    pub language: Language,
}

impl Locale {
    /// Creates a new [`Locale`] of the provided [`Language`].
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    /// Returns the title placeholder of a request without a title.
    #[must_use]
    pub const fn untitled(&self) -> &'static str {
        match self.language {
            Language::Tr => "Başlıksız Talep",
            Language::En => "Untitled request",
        }
    }

    /// Returns the word to be typed literally to confirm a destructive
    /// [`bulk::ActionId::DeleteSelected`] action.
    #[must_use]
    pub const fn delete_confirmation(&self) -> &'static str {
        match self.language {
            Language::Tr => "SİL",
            Language::En => "DELETE",
        }
    }

    /// Returns the label of the provided [`Status`].
    #[must_use]
    pub const fn status(&self, status: Status) -> &'static str {
        match (self.language, status) {
            (Language::Tr, Status::Open) => "Açık",
            (Language::Tr, Status::InProgress) => "İşlemde",
            (Language::Tr, Status::Waiting) => "Beklemede",
            (Language::Tr, Status::Resolved) => "Çözüldü",
            (Language::Tr, Status::Closed) => "Kapatıldı",
            (Language::En, Status::Open) => "Open",
            (Language::En, Status::InProgress) => "In progress",
            (Language::En, Status::Waiting) => "Waiting",
            (Language::En, Status::Resolved) => "Resolved",
            (Language::En, Status::Closed) => "Closed",
        }
    }

    /// Returns the label of the provided [`Priority`].
    #[must_use]
    pub const fn priority(&self, priority: Priority) -> &'static str {
        match (self.language, priority) {
            (Language::Tr, Priority::Low) => "Düşük",
            (Language::Tr, Priority::Medium) => "Orta",
            (Language::Tr, Priority::High) => "Yüksek",
            (Language::En, Priority::Low) => "Low",
            (Language::En, Priority::Medium) => "Medium",
            (Language::En, Priority::High) => "High",
        }
    }

    /// Returns the label of the provided [`Category`].
    #[must_use]
    pub const fn category(&self, category: Category) -> &'static str {
        match (self.language, category) {
            (Language::Tr, Category::Plumbing) => "Tesisat",
            (Language::Tr, Category::Electrical) => "Elektrik",
            (Language::Tr, Category::Heating) => "Isıtma",
            (Language::Tr, Category::Elevator) => "Asansör",
            (Language::Tr, Category::Cleaning) => "Temizlik",
            (Language::Tr, Category::Security) => "Güvenlik",
            (Language::Tr, Category::Landscaping) => "Peyzaj",
            (Language::Tr, Category::Painting) => "Boya",
            (Language::Tr, Category::Carpentry) => "Marangozluk",
            (Language::Tr, Category::Other) => "Diğer",
            (Language::En, Category::Plumbing) => "Plumbing",
            (Language::En, Category::Electrical) => "Electrical",
            (Language::En, Category::Heating) => "Heating",
            (Language::En, Category::Elevator) => "Elevator",
            (Language::En, Category::Cleaning) => "Cleaning",
            (Language::En, Category::Security) => "Security",
            (Language::En, Category::Landscaping) => "Landscaping",
            (Language::En, Category::Painting) => "Painting",
            (Language::En, Category::Carpentry) => "Carpentry",
            (Language::En, Category::Other) => "Other",
        }
    }

    /// Returns the label of the provided [`bulk::ActionId`].
    #[must_use]
    pub const fn bulk_action(&self, action: bulk::ActionId) -> &'static str {
        use bulk::ActionId as A;

        match (self.language, action) {
            (Language::Tr, A::MarkInProgress) => "İşleme Al",
            (Language::Tr, A::MarkCompleted) => "Tamamlandı Olarak İşaretle",
            (Language::Tr, A::AssignTechnician) => "Teknisyen Ata",
            (Language::Tr, A::ChangePriority) => "Önceliği Değiştir",
            (Language::Tr, A::ExportSelected) => "Seçilenleri Dışa Aktar",
            (Language::Tr, A::DeleteSelected) => "Seçilenleri Sil",
            (Language::En, A::MarkInProgress) => "Mark in progress",
            (Language::En, A::MarkCompleted) => "Mark completed",
            (Language::En, A::AssignTechnician) => "Assign technician",
            (Language::En, A::ChangePriority) => "Change priority",
            (Language::En, A::ExportSelected) => "Export selected",
            (Language::En, A::DeleteSelected) => "Delete selected",
        }
    }
}
