#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZero;

    use image::{imageops, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    use crate::builder::{BoardBuilder, BuilderInvalidReason};
    use crate::config::{Config, ExtractorConfig, GridLines, RenderConfig};
    use crate::error::ErrorKind;
    use crate::extract::{area, find_contours, BorderType, BoundaryPolicy, BoundingBox, Contour, ExtractionFailure, GridExtractor, SecondLargestContour};
    use crate::location::Location;
    use crate::region::{RegionColor, RegionColorTable, RegionTable};
    use crate::render::{MarkerGlyph, Renderer};
    use crate::solver::SolverFailure;
    use crate::{solve, Board, Pipeline, SolvedBoard};

    const MARGIN: u32 = 20;
    const CELL: u32 = 60;
    const LINE: u32 = 2;
    const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

    fn palette(display: char) -> Rgb<u8> {
        match display {
            'a' => Rgb([200, 60, 60]),
            'b' => Rgb([60, 160, 220]),
            'c' => Rgb([90, 200, 90]),
            'd' => Rgb([230, 200, 80]),
            'e' => Rgb([170, 120, 210]),
            _ => Rgb([140, 140, 140]),
        }
    }

    /// A screenshot-like puzzle: white page, black board outline and grid lines, solid cells colored by `palette`.
    fn draw_puzzle(rows: &[&str]) -> RgbImage {
        let n = rows.len() as u32;
        let board_side = n * CELL + LINE;
        let side = 2 * MARGIN + board_side;

        let mut image = RgbImage::from_pixel(side, side, Rgb([255, 255, 255]));
        draw_filled_rect_mut(&mut image, Rect::at(MARGIN as i32, MARGIN as i32).of_size(board_side, board_side), Rgb([0, 0, 0]));
        for (row, displays) in rows.iter().enumerate() {
            for (column, display) in displays.chars().enumerate() {
                let x = MARGIN + column as u32 * CELL + LINE;
                let y = MARGIN + row as u32 * CELL + LINE;
                draw_filled_rect_mut(&mut image, Rect::at(x as i32, y as i32).of_size(CELL - LINE, CELL - LINE), palette(display));
            }
        }

        image
    }

    fn board(rows: &str) -> Board {
        rows.parse().unwrap()
    }

    /// Checks the placement rules directly rather than trusting the solver's bookkeeping.
    fn assert_valid_placement(board: &Board, columns: &[usize]) {
        let n = board.size().get();
        assert_eq!(columns.len(), n);
        assert_eq!(columns.iter().collect::<HashSet<_>>().len(), n, "columns repeat: {columns:?}");

        let regions = columns.iter().enumerate()
            .map(|(row, column)| board.region_at(Location(row, *column)).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(regions.len(), n, "regions repeat: {columns:?}");

        for row in 1..n {
            assert_ne!(columns[row].abs_diff(columns[row - 1]), 1, "rows {} and {row} touch: {columns:?}", row - 1);
        }
    }

    fn placement_columns(solved: &SolvedBoard) -> Vec<usize> {
        solved.placement().locations().map(|l| l.column()).collect()
    }

    /// A board whose regions grow around `seeds` (one marker column per row), so `seeds` itself solves it.
    fn seeded_board(seeds: &[usize]) -> Board {
        let n = seeds.len();
        let rows = (0..n)
            .map(|row| {
                (0..n)
                    .map(|column| {
                        let owner = (0..n)
                            .min_by_key(|seed_row| (seed_row.abs_diff(row) + seeds[*seed_row].abs_diff(column), *seed_row))
                            .unwrap();
                        (b'a' + owner as u8) as char
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        board(&rows.join("\n"))
    }

    #[test]
    fn region_table_reuses_ids() {
        let mut table = RegionColorTable::new();
        let red = RegionColor([200, 10, 10]);
        let blue = RegionColor([10, 10, 200]);

        let first = table.assign(red);
        assert_eq!(table.assign(red), first);
        let second = table.assign(blue);
        assert_ne!(first, second);
        assert_eq!(table.len(), 2);

        assert_eq!(table.color_of(first), Some(red));
        assert_eq!(table.color_of(second), Some(blue));
        assert_eq!(first.to_string(), "1");
        assert_eq!(second.to_string(), "2");
    }

    #[test]
    fn region_table_rejects_foreign_ids() {
        let mut wide = RegionTable::new();
        wide.assign('a');
        let foreign = wide.assign('b');

        let mut narrow = RegionColorTable::new();
        narrow.assign(RegionColor([1, 2, 3]));
        assert_eq!(narrow.color_of(foreign), None);
    }

    #[test]
    fn text_board_round_trip() {
        let board = board("
            xxyy
            xzzy
            wwzy
            wwww
        ");

        assert_eq!(board.size().get(), 4);
        assert_eq!(board.region_count(), 4);
        assert_eq!(format!("{}", board), "xxyy
xzzy
wwzy
wwww
");
    }

    #[test]
    fn builder_invalid_states() {
        let size = NonZero::new(3).unwrap();

        let mut builder = BoardBuilder::with_size(size);
        builder.paint_row(0, "ab");
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::RowLengthMismatch { row: 0, len: 2 }]));
        // invalid builders ignore further painting
        builder.paint(Location(5, 5), 'a');
        assert_eq!(builder.build().unwrap_err().len(), 1);

        let mut builder = BoardBuilder::with_size(size);
        builder.paint(Location(0, 3), 'a');
        assert_eq!(builder.build().unwrap_err(), vec![BuilderInvalidReason::FeatureOutOfBounds]);

        let mut builder = BoardBuilder::with_size(size);
        builder.paint_row(0, "aab").paint_row(1, "abb");
        assert!(builder.is_valid().is_none());
        assert_eq!(builder.build().unwrap_err(), vec![
            BuilderInvalidReason::Unpainted(Location(2, 0)),
            BuilderInvalidReason::Unpainted(Location(2, 1)),
            BuilderInvalidReason::Unpainted(Location(2, 2)),
        ]);

        assert!("".parse::<Board>().is_err());
        assert!("ab\nabc".parse::<Board>().is_err());
    }

    #[test]
    fn board_from_cells_needs_square() {
        let mut table = RegionTable::new();
        let id = table.assign('a');
        assert!(Board::from_cells(ndarray::Array2::from_elem((2, 3), id)).is_none());
        assert!(Board::from_cells(ndarray::Array2::from_elem((0, 0), id)).is_none());

        let board = Board::from_cells(ndarray::Array2::from_elem((2, 2), id)).unwrap();
        assert_eq!(format!("{}", board), "aa\naa\n");
    }

    #[test]
    fn solve_single_cell() {
        let solved = board("a").solve().unwrap();
        assert_valid_placement(solved.board(), &placement_columns(&solved));
        assert_eq!(solved.placement().locations().collect::<Vec<_>>(), vec![Location(0, 0)]);
        assert_eq!(format!("{}", solved), "A\n");
    }

    #[test]
    fn solve_unique_four() {
        let solved = board("
            aabb
            aabb
            cccd
            cddd
        ").solve().unwrap();
        assert_valid_placement(solved.board(), &placement_columns(&solved));

        assert_eq!(format!("{}", solved), "aAbb
aabB
Cccd
cdDd
");
        assert_eq!(solved.placement().len(), 4);
        assert_eq!(solved.placement().column_of(2), Some(0));
        assert!(solved.placement().contains(Location(3, 2)));
        assert!(!solved.placement().contains(Location(3, 3)));
    }

    #[test]
    fn solve_eight_takes_first_in_column_order() {
        let board = board("
            aaaabbbb
            acaabbbb
            cccdddbe
            ccfddeee
            cffgdeee
            ffggghee
            fhhhhhhe
            hhhhhhhh
        ");

        let first = board.clone().solve().unwrap();
        let columns = placement_columns(&first);
        assert_eq!(columns, vec![0, 6, 2, 4, 1, 3, 7, 5]);
        assert_valid_placement(&board, &columns);
        // (0, 0) and (2, 2) share a diagonal, which is fine two rows apart
        assert_eq!(columns[2] - columns[0], 2);

        let again = board.solve().unwrap();
        assert_eq!(again.placement(), first.placement());
    }

    #[test]
    fn solve_generated_boards_obey_rules() {
        for rows in ["aaaa\nbbbb\ncccc\ndddd", "abcd\nabcd\nabcd\nabcd", "abbb\naabb\naccd\ncccd"] {
            let solved = board(rows).solve().unwrap();
            assert_valid_placement(solved.board(), &placement_columns(&solved));
        }

        for seeds in [
            vec![1, 3, 0, 2],
            vec![0, 2, 4, 1, 3],
            vec![1, 3, 5, 0, 2, 4],
            vec![0, 2, 4, 6, 1, 3, 5],
            vec![0, 6, 2, 4, 1, 3, 7, 5],
            vec![3, 0, 4, 7, 1, 6, 2, 5, 8],
        ] {
            let board = seeded_board(&seeds);
            assert_eq!(board.region_count(), seeds.len());
            assert_valid_placement(&board, &seeds);

            let solved = board.solve().unwrap();
            assert_valid_placement(solved.board(), &placement_columns(&solved));
        }
    }

    #[test]
    fn solve_unsatisfiable() {
        assert_eq!(board("aa\naa").solve().unwrap_err(), SolverFailure::Unsatisfiable { size: NonZero::new(2).unwrap() });

        // three regions cannot host four markers
        let failure = board("
            aabb
            aabb
            ccbb
            ccbb
        ").solve().unwrap_err();
        assert_eq!(failure.to_string(), "no marker placement satisfies this 4x4 board");
    }

    #[test]
    fn trace_ring() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([255]));
        for y in 1..4 {
            for x in 1..4 {
                image.put_pixel(x, y, Luma([0]));
            }
        }

        let contours = find_contours(&image);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].border_type, BorderType::Outer);
        assert_eq!(contours[0].points.len(), 16);
        assert_eq!(area(&contours[0]), 16.0);
        assert_eq!(contours[0].parent, None);
        assert_eq!(contours[1].border_type, BorderType::Hole);
        assert_eq!(contours[1].points.len(), 12);
        assert_eq!(area(&contours[1]), 14.0);
        assert_eq!(contours[1].parent, Some(0));
        assert_eq!(BoundingBox::of(&contours[1]), BoundingBox { x: 0, y: 0, width: 5, height: 5 });
    }

    #[test]
    fn trace_nested_and_isolated() {
        // 2px frame around a 3x3 block
        let image = GrayImage::from_fn(9, 9, |x, y| {
            let frame = x < 2 || x > 6 || y < 2 || y > 6;
            let block = (3..=5).contains(&x) && (3..=5).contains(&y);
            Luma([if frame || block { 80 } else { 0 }])
        });

        let contours = find_contours(&image);
        let summary = contours.iter()
            .map(|c| (c.border_type, area(c), BoundingBox::of(c)))
            .collect::<Vec<_>>();
        assert_eq!(summary, vec![
            (BorderType::Outer, 64.0, BoundingBox { x: 0, y: 0, width: 9, height: 9 }),
            (BorderType::Hole, 34.0, BoundingBox { x: 1, y: 1, width: 7, height: 7 }),
            (BorderType::Outer, 4.0, BoundingBox { x: 3, y: 3, width: 3, height: 3 }),
        ]);
        assert_eq!(contours.iter().map(|c| c.parent).collect::<Vec<_>>(), vec![None, Some(0), Some(1)]);

        let mut dot = GrayImage::new(3, 3);
        dot.put_pixel(1, 1, Luma([5]));
        let contours = find_contours(&dot);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 1);
        assert_eq!(area(&contours[0]), 0.0);
        assert_eq!(BoundingBox::of(&contours[0]), BoundingBox { x: 1, y: 1, width: 1, height: 1 });

        assert!(find_contours(&GrayImage::new(4, 4)).is_empty());
    }

    #[test]
    fn extract_four() {
        let image = draw_puzzle(&["aabb", "aabb", "cccd", "cddd"]);
        let grid = GridExtractor::default().extract(&image).unwrap();

        assert_eq!(grid.bounds, BoundingBox { x: MARGIN - 1, y: MARGIN - 1, width: 4 * CELL + LINE + 2, height: 4 * CELL + LINE + 2 });
        assert_eq!(grid.grid.dimensions(), (grid.bounds.width, grid.bounds.height));
        assert_eq!(format!("{}", grid.board), "aabb
aabb
cccd
cddd
");
        assert_eq!(grid.colors.len(), 4);
        for (display, color) in ['a', 'b', 'c', 'd'].into_iter().zip(grid.colors.keys().iter()) {
            assert_eq!(Rgb::<u8>::from(*color), palette(display));
        }
    }

    #[test]
    fn extract_checkerboards() {
        for rows in [
            vec!["ab", "ba"],
            vec!["aba", "bab", "aba"],
            vec!["cecec", "ecece", "cecec", "ecece", "cecec"],
        ] {
            let image = draw_puzzle(&rows);
            let grid = GridExtractor::default().extract(&image).unwrap();
            assert_eq!(grid.board.size().get(), rows.len());

            let mut relabel = RegionTable::new();
            for (location, id) in grid.board.cells() {
                let display = rows[location.row()].chars().nth(location.column()).unwrap();
                assert_eq!(relabel.assign(display), id, "at {location:?}");
            }
        }
    }

    #[test]
    fn extract_failures() {
        let blank = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        assert_eq!(GridExtractor::default().extract(&blank).unwrap_err(), ExtractionFailure::TooFewContours { found: 1 });

        let mut three = draw_puzzle(&["ab", "ba"]);
        let x = MARGIN + CELL + LINE;
        draw_filled_rect_mut(&mut three, Rect::at(x as i32, x as i32).of_size(CELL - LINE, CELL - LINE), Rgb([0, 0, 0]));
        assert_eq!(GridExtractor::default().extract(&three).unwrap_err(), ExtractionFailure::NonSquareCellCount { total_cells: 3 });

        // the crop keeps one pixel of page on each side
        let cell = (2 * CELL + LINE + 2) / 2;
        let tight = GridExtractor::new(ExtractorConfig { cell_padding: cell / 2 });
        assert_eq!(tight.extract(&draw_puzzle(&["ab", "ba"])).unwrap_err(), ExtractionFailure::CellTooSmall {
            width: cell,
            height: cell,
            padding: cell / 2,
        });

        let huge = GridExtractor::new(ExtractorConfig { cell_padding: u32::MAX });
        assert_eq!(huge.extract(&draw_puzzle(&["ab", "ba"])).unwrap_err(), ExtractionFailure::CellTooSmall {
            width: cell,
            height: cell,
            padding: u32::MAX,
        });
    }

    /// Takes the largest hole as the play area and counts the outer borders nested inside something as cells.
    struct NestedCells;

    impl BoundaryPolicy for NestedCells {
        fn select_play_area<'c>(&self, contours: &'c [Contour<u32>]) -> Option<&'c Contour<u32>> {
            contours.iter()
                .filter(|c| c.border_type == BorderType::Hole)
                .max_by(|a, b| area(a).total_cmp(&area(b)))
        }

        fn count_cells(&self, contours: &[Contour<u32>]) -> usize {
            contours.iter()
                .filter(|c| c.border_type == BorderType::Outer && c.parent.is_some())
                .count()
        }
    }

    #[test]
    fn extract_with_custom_policy() {
        let image = draw_puzzle(&["aabb", "aabb", "cccd", "cddd"]);
        let expected = GridExtractor::default().extract(&image).unwrap();

        let nested = GridExtractor::with_policy(ExtractorConfig::default(), NestedCells).extract(&image).unwrap();
        assert_eq!(nested.bounds, expected.bounds);
        assert_eq!(format!("{}", nested.board), format!("{}", expected.board));

        // a policy that never finds the puzzle surfaces as an extraction failure
        struct Nowhere;
        impl BoundaryPolicy for Nowhere {
            fn select_play_area<'c>(&self, _: &'c [Contour<u32>]) -> Option<&'c Contour<u32>> {
                None
            }

            fn count_cells(&self, contours: &[Contour<u32>]) -> usize {
                SecondLargestContour.count_cells(contours)
            }
        }
        let found = find_contours(&imageops::grayscale(&image)).len();
        assert_eq!(GridExtractor::with_policy(ExtractorConfig::default(), Nowhere).extract(&image).unwrap_err(), ExtractionFailure::TooFewContours { found });

        let pipeline = Pipeline::with_policy(Config::new("unused.png", "unused.png"), NestedCells);
        let solved = pipeline.solve_board(&image).unwrap();
        assert_eq!(placement_columns(&solved), vec![1, 3, 0, 2]);
    }

    #[test]
    fn overlay_opaque_and_transparent() {
        let background = RgbImage::from_pixel(6, 6, Rgb([10, 20, 30]));
        let glyph = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8 * 50, y as u8 * 50, 7, 255]));

        let mut canvas = background.clone();
        MarkerGlyph::from_rgba(glyph.clone()).overlay(&mut canvas, 2, 1);
        for (x, y, pixel) in glyph.enumerate_pixels() {
            assert_eq!(canvas.get_pixel(x + 2, y + 1).0, [pixel[0], pixel[1], pixel[2]]);
        }
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([10, 20, 30]));

        let clear = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 0]));
        let mut canvas = background.clone();
        MarkerGlyph::from_rgba(clear).overlay(&mut canvas, 2, 1);
        assert_eq!(canvas, background);

        let half = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 128]));
        let mut canvas = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));
        MarkerGlyph::from_rgba(half).overlay(&mut canvas, 0, 0);
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([150, 150, 150]));

        // no alpha channel: copied as is, and clipped at the canvas edge
        let mut canvas = background.clone();
        MarkerGlyph::from_rgb(RgbImage::from_pixel(4, 4, MAGENTA)).overlay(&mut canvas, 4, 4);
        assert_eq!(canvas.get_pixel(5, 5), &MAGENTA);
        assert_eq!(canvas.get_pixel(3, 3), &Rgb([10, 20, 30]));
    }

    fn colors_for(board: &Board) -> RegionColorTable {
        // builder boards number regions by first appearance, as the table does
        let mut colors = RegionColorTable::new();
        for display in format!("{}", board).chars().filter(|c| *c != '\n') {
            colors.assign(palette(display).into());
        }
        colors
    }

    #[test]
    fn render_grid_lines() {
        let solved = board("a").solve().unwrap();
        let colors = colors_for(solved.board());
        let glyph = MarkerGlyph::from_rgb(RgbImage::from_pixel(2, 2, MAGENTA));

        let top_only = Renderer::new(RenderConfig { grid_lines: GridLines::TopEdges, ..Default::default() })
            .render((40, 40), &solved, &colors, &glyph)
            .unwrap();
        assert_eq!(top_only.get_pixel(20, 0), &Rgb([0, 0, 0]));
        assert_eq!(top_only.get_pixel(39, 20), &palette('a'));
        assert_ne!(top_only.get_pixel(20, 20), &palette('a'));

        let all = Renderer::default().render((40, 40), &solved, &colors, &glyph).unwrap();
        assert_eq!(all.get_pixel(39, 20), &Rgb([0, 0, 0]));
        assert_eq!(all.get_pixel(20, 39), &Rgb([0, 0, 0]));
        assert_eq!(all.get_pixel(2, 2), &palette('a'));
    }

    #[test]
    fn render_unknown_region() {
        let solved = board("a").solve().unwrap();
        let glyph = MarkerGlyph::from_rgb(RgbImage::new(1, 1));
        let err = Renderer::default().render((10, 10), &solved, &RegionColorTable::new(), &glyph).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn solve_image_end_to_end() {
        let rows = ["aabb", "aabb", "cccd", "cddd"];
        let image = draw_puzzle(&rows);
        let glyph = MarkerGlyph::from_rgb(RgbImage::from_pixel(8, 8, MAGENTA));

        let rendered = solve(&image, &glyph).unwrap();
        let side = 4 * CELL + LINE + 2;
        assert_eq!(rendered.dimensions(), (side, side));

        let cell = side / 4;
        let markers = [Location(0, 1), Location(1, 3), Location(2, 0), Location(3, 2)];
        for (row, displays) in rows.iter().enumerate() {
            for (column, display) in displays.chars().enumerate() {
                let center = rendered.get_pixel(column as u32 * cell + cell / 2, row as u32 * cell + cell / 2);
                if markers.contains(&Location(row, column)) {
                    assert_ne!(center, &palette(display), "no marker at ({row}, {column})");
                } else {
                    assert_eq!(center, &palette(display), "unexpected marker at ({row}, {column})");
                }
            }
        }
    }

    #[test]
    fn pipeline_reports_each_failure_kind() {
        let config = Config::new("does/not/exist.png", "unused.png");
        let pipeline = Pipeline::new(config);

        let image = draw_puzzle(&["aabb", "aabb", "cccd", "cddd"]);
        let solved = pipeline.solve_board(&image).unwrap();
        assert_eq!(solved.placement().len(), 4);
        assert_eq!(pipeline.render(&image).unwrap_err().kind(), ErrorKind::Asset);

        let unsolvable = draw_puzzle(&["aa", "aa"]);
        assert_eq!(pipeline.render(&unsolvable).unwrap_err().kind(), ErrorKind::Unsatisfiable);

        let blank = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        assert_eq!(pipeline.render(&blank).unwrap_err().kind(), ErrorKind::Extraction);

        assert_eq!(pipeline.run("does/not/exist/either.png").unwrap_err().kind(), ErrorKind::Io);
    }
}
