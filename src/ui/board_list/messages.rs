#[derive(Debug, Clone)]
pub enum BoardListMessage {
    SetHwModel(usize, u32),
    SetPort(usize, String),
    SetFirmwareVersion(usize, String),
    AddBoard,
    DuplicateBoard(usize),
    DeleteBoard(usize),
    /// Open the folder picker for a mass-storage board's mount path.
    PickMassStoragePath(usize),
    MassStoragePathPicked(usize, Option<String>),
}
