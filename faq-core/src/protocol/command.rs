#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    LangGet,
    LangSet,
    DatasetLoad,
    BrowseQuery,
    BrowseInput,
    BrowseTick,
    BrowseFilter,
    BrowseJump,
    BrowseReset,
    BrowseClear,
    BrowseToggle,
    BrowseExpandAll,
    BrowseCollapseAll,
    BrowseView,
    BrowseCopy,
    AdminOpen,
    AdminSelect,
    AdminStageImage,
    AdminAddImage,
    AdminRemoveImage,
    AdminSaveDraft,
    AdminLoadDraft,
    AdminExport,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "lang.get" => Command::LangGet,
            "lang.set" => Command::LangSet,
            "dataset.load" => Command::DatasetLoad,
            "browse.query" => Command::BrowseQuery,
            "browse.input" => Command::BrowseInput,
            "browse.tick" => Command::BrowseTick,
            "browse.filter" => Command::BrowseFilter,
            "browse.jump" => Command::BrowseJump,
            "browse.reset" => Command::BrowseReset,
            "browse.clear" => Command::BrowseClear,
            "browse.toggle" => Command::BrowseToggle,
            "browse.expand_all" => Command::BrowseExpandAll,
            "browse.collapse_all" => Command::BrowseCollapseAll,
            "browse.view" => Command::BrowseView,
            "browse.copy" => Command::BrowseCopy,
            "admin.open" => Command::AdminOpen,
            "admin.select" => Command::AdminSelect,
            "admin.stage_image" => Command::AdminStageImage,
            "admin.add_image" => Command::AdminAddImage,
            "admin.remove_image" => Command::AdminRemoveImage,
            "admin.save_draft" => Command::AdminSaveDraft,
            "admin.load_draft" => Command::AdminLoadDraft,
            "admin.export" => Command::AdminExport,
            _ => Command::Unknown,
        }
    }
}

impl Command {
    pub fn is_browse(self) -> bool {
        matches!(
            self,
            Command::BrowseQuery
                | Command::BrowseInput
                | Command::BrowseTick
                | Command::BrowseFilter
                | Command::BrowseJump
                | Command::BrowseReset
                | Command::BrowseClear
                | Command::BrowseToggle
                | Command::BrowseExpandAll
                | Command::BrowseCollapseAll
                | Command::BrowseView
                | Command::BrowseCopy
        )
    }

    pub fn is_admin(self) -> bool {
        matches!(
            self,
            Command::AdminOpen
                | Command::AdminSelect
                | Command::AdminStageImage
                | Command::AdminAddImage
                | Command::AdminRemoveImage
                | Command::AdminSaveDraft
                | Command::AdminLoadDraft
                | Command::AdminExport
        )
    }
}
