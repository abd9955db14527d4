use proptest::prelude::*;

use textcast_editor_model::{
    split_segments, BoxSize, Container, EditorState, Position, VideoSource, SEGMENT_DELIMITER,
};

fn segment_text() -> impl Strategy<Value = String> {
    "[a-z .\n\t]{0,24}"
}

proptest! {
    #[test]
    fn segments_are_never_blank(text in "[a-z .\n\t]{0,80}") {
        for segment in split_segments(&text) {
            prop_assert!(!segment.trim().is_empty());
            prop_assert_eq!(segment.trim(), segment.as_str());
        }
    }

    #[test]
    fn joined_segments_split_back_in_order(parts in prop::collection::vec("[a-z]{1,12}", 0..8)) {
        let text = parts.join(SEGMENT_DELIMITER);
        prop_assert_eq!(split_segments(&text), parts);
    }

    #[test]
    fn delimiter_free_text_is_one_trimmed_segment(text in segment_text()) {
        prop_assume!(!text.contains(SEGMENT_DELIMITER));
        let expected: Vec<String> = if text.trim().is_empty() {
            vec![]
        } else {
            vec![text.trim().to_string()]
        };
        prop_assert_eq!(split_segments(&text), expected);
    }

    #[test]
    fn bounded_position_never_leaves_container(
        x in -5000.0f64..5000.0,
        y in -5000.0f64..5000.0,
        box_w in 50.0f64..1000.0,
        box_h in 50.0f64..1000.0,
        container_w in 0.0f64..4000.0,
        container_h in 0.0f64..4000.0,
    ) {
        let container = Container::new(container_w, container_h);
        let pos = Position::bounded(x, y, BoxSize { width: box_w, height: box_h }, container);
        prop_assert!(pos.is_within(container));
        if box_w <= container_w {
            prop_assert!(pos.x + box_w <= container_w + 1e-9);
        }
        if box_h <= container_h {
            prop_assert!(pos.y + box_h <= container_h + 1e-9);
        }
    }

    #[test]
    fn dragging_a_loaded_editor_stays_in_frame(
        width in 1u32..4000,
        height in 1u32..4000,
        x in -10_000.0f64..10_000.0,
        y in -10_000.0f64..10_000.0,
    ) {
        let mut state = EditorState::default();
        let video = VideoSource::new("clip.mp4", width, height);
        let container = video.container();
        state.load_video(video);
        let pos = state.drag_to(x, y).unwrap();
        prop_assert!(pos.is_within(container));
    }

    #[test]
    fn replacing_the_video_keeps_position_in_frame(
        first_w in 1u32..4000,
        first_h in 1u32..4000,
        second_w in 1u32..4000,
        second_h in 1u32..4000,
        x in 0.0f64..4000.0,
        y in 0.0f64..4000.0,
    ) {
        let mut state = EditorState::default();
        state.load_video(VideoSource::new("first.mp4", first_w, first_h));
        state.drag_to(x, y).unwrap();

        let second = VideoSource::new("second.mp4", second_w, second_h);
        let container = second.container();
        state.load_video(second);

        let pos = state.position();
        prop_assert!(pos.is_within(container));
        let size = state.style().box_size();
        if size.width <= container.width {
            prop_assert!(pos.x + size.width <= container.width + 1e-9);
        }
        if size.height <= container.height {
            prop_assert!(pos.y + size.height <= container.height + 1e-9);
        }
    }
}
