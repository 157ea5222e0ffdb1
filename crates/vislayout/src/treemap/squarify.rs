use crate::Rect;

/// The golden ratio, target aspect ratio of squarified rows
pub const PHI: f64 = 1.618_033_988_749_895;

/// Tile `area` with one rectangle per value, in input order
///
/// Squarified layout: consecutive values are grouped into rows, and a row
/// keeps growing while its worst aspect ratio (relative to `ratio`) does not
/// get worse. A row is laid out horizontally when the remaining area is
/// taller than wide, vertically otherwise. Zero values get zero-area
/// rectangles inside the row they fall into; if nothing is left to share,
/// every remaining rectangle collapses onto the leading edge.
pub(crate) fn squarify(ratio: f64, values: &[f64], total: f64, area: Rect) -> Vec<Rect> {
    let mut tiles = Vec::with_capacity(values.len());
    let Rect { mut x0, mut y0, x1, y1 } = area;
    let mut remaining = total;
    let n = values.len();
    let mut i0 = 0;

    while i0 < n {
        let (dx, dy) = (x1 - x0, y1 - y0);

        // Leading empty values join the row of the next non-empty one
        let mut i1 = i0;
        let mut sum = 0.0;
        while i1 < n {
            sum = values[i1];
            i1 += 1;
            if sum > 0.0 {
                break;
            }
        }

        if sum > 0.0 && remaining > 0.0 && dx > 0.0 && dy > 0.0 {
            let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
            let (mut min_value, mut max_value) = (sum, sum);
            let beta = sum * sum * alpha;
            let mut min_ratio = (max_value / beta).max(beta / min_value);

            while i1 < n {
                let value = values[i1];
                let next_sum = sum + value;
                let (next_min, next_max) = (min_value.min(value), max_value.max(value));
                let beta = next_sum * next_sum * alpha;
                let next_ratio = (next_max / beta).max(beta / next_min);
                if next_ratio > min_ratio {
                    break;
                }
                sum = next_sum;
                min_value = next_min;
                max_value = next_max;
                min_ratio = next_ratio;
                i1 += 1;
            }
        } else {
            // Nothing sensible to optimise, the rest shares one row
            i1 = n;
            sum = values[i0..].iter().sum();
        }

        let row = &values[i0..i1];
        if dx < dy {
            let y_end = if remaining > 0.0 {
                y0 + dy * sum / remaining
            } else {
                y1
            };
            dice(row, sum, Rect::new(x0, y0, x1, y_end), &mut tiles);
            if remaining > 0.0 {
                y0 = y_end;
            }
        } else {
            let x_end = if remaining > 0.0 {
                x0 + dx * sum / remaining
            } else {
                x1
            };
            slice(row, sum, Rect::new(x0, y0, x_end, y1), &mut tiles);
            if remaining > 0.0 {
                x0 = x_end;
            }
        }

        remaining -= sum;
        i0 = i1;
    }

    tiles
}

/// Split `area` horizontally, left to right
fn dice(values: &[f64], total: f64, area: Rect, tiles: &mut Vec<Rect>) {
    let k = if total > 0.0 { area.width() / total } else { 0.0 };
    let mut x = area.x0;
    for &value in values {
        let next = x + value * k;
        tiles.push(Rect::new(x, area.y0, next, area.y1));
        x = next;
    }
}

/// Split `area` vertically, top to bottom
fn slice(values: &[f64], total: f64, area: Rect, tiles: &mut Vec<Rect>) {
    let k = if total > 0.0 { area.height() / total } else { 0.0 };
    let mut y = area.y0;
    for &value in values {
        let next = y + value * k;
        tiles.push(Rect::new(area.x0, y, area.x1, next));
        y = next;
    }
}
