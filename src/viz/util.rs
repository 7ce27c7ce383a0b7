use crossterm::event::{Event, KeyCode, KeyEventKind};

/// Takes an event, checks if it is a key press event, and returns the [`KeyCode`]
pub(super) fn event_keycode(event: &Event) -> Option<KeyCode> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.kind != KeyEventKind::Press {
        return None;
    }

    Some(key.code)
}

/// Map a maze row to a canvas y coordinate, which grows upward
pub(super) fn flip_y(y: f64, size: usize) -> f64 {
    size as f64 - 1.0 - y
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers};

    use super::*;

    #[test]
    fn only_presses_yield_keycodes() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(event_keycode(&press), Some(KeyCode::Char('q')));

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(event_keycode(&Event::Key(release)), None);
        assert_eq!(event_keycode(&Event::FocusGained), None);
    }

    #[test]
    fn flip_y_maps_rows() {
        assert_eq!(flip_y(0.0, 15), 14.0);
        assert_eq!(flip_y(14.0, 15), 0.0);
        assert_eq!(flip_y(0.5, 2), 0.5);
    }
}
