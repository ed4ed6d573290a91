use crate::models::BoardFlashConfig;

/// Ordered list of board flash configurations.
///
/// Entries are addressed positionally, so insert/remove/duplicate shift all
/// later indices. Every operation returns a new list and leaves `self`
/// untouched; an out-of-range index returns a list value-equal to the input
/// rather than panicking, so a stale index from the view layer can never
/// crash the application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardListState {
    boards: Vec<BoardFlashConfig>,
}

impl BoardListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boards(&self) -> &[BoardFlashConfig] {
        &self.boards
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    fn with_entry(
        &self,
        index: usize,
        update: impl FnOnce(&BoardFlashConfig) -> BoardFlashConfig,
    ) -> Self {
        let mut boards = self.boards.clone();

        match boards.get_mut(index) {
            Some(entry) => *entry = update(entry),
            None => return self.clone(),
        }

        Self { boards }
    }

    /// Replace the hardware-model field of the entry at `index`.
    pub fn set_hw_model(&self, index: usize, hw_model: u32) -> Self {
        self.with_entry(index, |board| BoardFlashConfig {
            selected_hw_model: Some(hw_model),
            ..board.clone()
        })
    }

    /// Replace the port field of the entry at `index`.
    pub fn set_port(&self, index: usize, port: String) -> Self {
        self.with_entry(index, |board| BoardFlashConfig {
            selected_port: Some(port),
            ..board.clone()
        })
    }

    /// Replace the firmware-version field of the entry at `index`.
    pub fn set_firmware_version(&self, index: usize, version: String) -> Self {
        self.with_entry(index, |board| BoardFlashConfig {
            selected_firmware_version: Some(version),
            ..board.clone()
        })
    }

    /// Append a fully-formed entry. The caller supplies any defaults; no
    /// defaulting happens here.
    pub fn add_board(&self, board: BoardFlashConfig) -> Self {
        let mut boards = self.boards.clone();
        boards.push(board);

        Self { boards }
    }

    /// Insert a copy of the entry at `index` immediately before it: the copy
    /// lands at `index` and the original shifts to `index + 1`.
    pub fn duplicate_board(&self, index: usize) -> Self {
        if index >= self.boards.len() {
            return self.clone();
        }

        let mut boards = self.boards.clone();
        let copy = boards[index].clone();
        boards.insert(index, copy);

        Self { boards }
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn delete_board(&self, index: usize) -> Self {
        if index >= self.boards.len() {
            return self.clone();
        }

        let mut boards = self.boards.clone();
        boards.remove(index);

        Self { boards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hw_model: u32, port: Option<&str>, version: &str) -> BoardFlashConfig {
        BoardFlashConfig {
            selected_hw_model: Some(hw_model),
            selected_port: port.map(str::to_string),
            selected_firmware_version: Some(version.to_string()),
        }
    }

    #[test]
    fn add_board_appends_in_call_order() {
        let mut state = BoardListState::new();

        for hw_model in [1, 2, 3] {
            state = state.add_board(config(hw_model, None, "v1"));
        }

        assert_eq!(state.len(), 3);
        let models: Vec<_> = state
            .boards()
            .iter()
            .map(|b| b.selected_hw_model.unwrap())
            .collect();
        assert_eq!(models, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_then_delete_restores_original_sequence() {
        let original = BoardListState::new()
            .add_board(config(1, Some("COM1"), "v1"))
            .add_board(config(2, None, "v2"))
            .add_board(config(3, Some("COM3"), "v3"));

        for index in 0..original.len() {
            let round_trip = original.duplicate_board(index).delete_board(index);
            assert_eq!(round_trip, original);
        }
    }

    #[test]
    fn duplicate_inserts_copy_before_original() {
        let state = BoardListState::new()
            .add_board(config(1, None, "v1"))
            .add_board(config(2, None, "v2"));

        let duplicated = state.duplicate_board(1).set_port(1, "COM7".to_string());

        assert_eq!(duplicated.len(), 3);
        assert_eq!(
            duplicated.boards()[1].selected_port.as_deref(),
            Some("COM7")
        );
        // The original shifted to index 2, untouched
        assert_eq!(duplicated.boards()[2], config(2, None, "v2"));
    }

    #[test]
    fn repeated_delete_never_panics() {
        let mut state = BoardListState::new()
            .add_board(config(1, None, "v1"))
            .add_board(config(2, None, "v2"))
            .add_board(config(3, None, "v3"));

        for _ in 0..10 {
            state = state.delete_board(0);
        }

        assert!(state.is_empty());
    }

    #[test]
    fn set_hw_model_touches_only_the_addressed_field() {
        let state = BoardListState::new()
            .add_board(config(1, Some("COM1"), "v1"))
            .add_board(config(2, Some("COM2"), "v2"));

        let updated = state.set_hw_model(1, 9);

        assert_eq!(updated.boards()[0], state.boards()[0]);
        assert_eq!(updated.boards()[1].selected_hw_model, Some(9));
        assert_eq!(
            updated.boards()[1].selected_port,
            state.boards()[1].selected_port
        );
        assert_eq!(
            updated.boards()[1].selected_firmware_version,
            state.boards()[1].selected_firmware_version
        );
    }

    #[test]
    fn operations_leave_the_input_snapshot_untouched() {
        let state = BoardListState::new().add_board(config(1, None, "v1"));
        let snapshot = state.clone();

        let _ = state.set_port(0, "COM1".to_string());
        let _ = state.duplicate_board(0);
        let _ = state.delete_board(0);

        assert_eq!(state, snapshot);
    }

    #[test]
    fn out_of_range_indices_are_value_equal_no_ops() {
        let state = BoardListState::new()
            .add_board(config(1, None, "v1"))
            .add_board(config(2, None, "v2"));

        for index in [state.len(), state.len() + 1, usize::MAX] {
            assert_eq!(state.set_hw_model(index, 9), state);
            assert_eq!(state.set_port(index, "COM9".to_string()), state);
            assert_eq!(state.set_firmware_version(index, "v9".to_string()), state);
            assert_eq!(state.duplicate_board(index), state);
            assert_eq!(state.delete_board(index), state);
        }
    }

    #[test]
    fn empty_list_operations_are_no_ops() {
        let empty = BoardListState::new();

        assert_eq!(empty.delete_board(0), empty);
        assert_eq!(empty.duplicate_board(0), empty);
        assert_eq!(empty.set_hw_model(0, 1), empty);
    }

    #[test]
    fn add_duplicate_set_port_scenario() {
        let state = BoardListState::new().add_board(config(1, None, "v1"));
        let state = state.duplicate_board(0);

        assert_eq!(
            state.boards(),
            &[config(1, None, "v1"), config(1, None, "v1")]
        );

        let state = state.set_port(1, "COM3".to_string());

        assert_eq!(
            state.boards(),
            &[config(1, None, "v1"), config(1, Some("COM3"), "v1")]
        );
    }
}
