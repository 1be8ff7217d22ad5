//! Face mesh topology: named landmark indices and feature connection tables.
//!
//! Index meanings follow the 468-point face mesh layout. Everything that
//! interprets a landmark by position goes through this module so that a
//! model with a different layout only needs a new table here.

/// Named landmark indices used by the expression classifier
pub mod index {
    /// Upper lip, top center
    pub const UPPER_LIP_TOP: usize = 0;
    /// Lower lip, bottom center
    pub const LOWER_LIP_BOTTOM: usize = 17;
    /// Left mouth corner
    pub const MOUTH_LEFT: usize = 61;
    /// Right mouth corner
    pub const MOUTH_RIGHT: usize = 291;

    pub const LEFT_EYE_UPPER_LID: usize = 159;
    pub const LEFT_EYE_LOWER_LID: usize = 145;
    pub const RIGHT_EYE_UPPER_LID: usize = 386;
    pub const RIGHT_EYE_LOWER_LID: usize = 374;

    pub const LEFT_EYEBROW_OUTER: usize = 105;
    pub const LEFT_EYEBROW_INNER: usize = 66;
    pub const RIGHT_EYEBROW_OUTER: usize = 334;
    pub const RIGHT_EYEBROW_INNER: usize = 296;

    /// Highest index the classifier reads
    pub const MAX_EXPRESSION_INDEX: usize = 386;
}

/// A named list of landmark index pairs to join with lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureTable {
    /// Anatomical feature name
    pub name: &'static str,
    /// Ordered `(from, to)` landmark index pairs
    pub connections: &'static [(usize, usize)],
}

impl FeatureTable {
    /// Highest landmark index referenced by this table
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.connections.iter().map(|&(a, b)| a.max(b)).max()
    }
}

/// Both eyes
#[rustfmt::skip]
pub const EYES: FeatureTable = FeatureTable {
    name: "eyes",
    connections: &[
        (33, 7), (7, 163), (163, 144), (144, 145), (145, 153),
        (153, 154), (154, 155), (155, 133), (33, 246), (246, 161),
        (362, 382), (382, 381), (381, 380), (380, 374), (374, 373),
        (373, 390), (390, 249), (249, 263), (362, 466), (466, 388),
    ],
};

/// Outer lips
#[rustfmt::skip]
pub const MOUTH: FeatureTable = FeatureTable {
    name: "mouth",
    connections: &[
        (61, 185), (185, 40), (40, 39), (39, 37), (37, 0),
        (0, 267), (267, 269), (269, 270), (270, 409), (409, 291),
        (61, 146), (146, 91), (91, 181), (181, 84), (84, 17),
        (17, 314), (314, 405), (405, 321), (321, 375), (375, 291),
    ],
};

/// Nose bridge and nostrils
#[rustfmt::skip]
pub const NOSE: FeatureTable = FeatureTable {
    name: "nose",
    connections: &[
        (1, 2), (2, 98), (98, 97), (97, 3), (3, 326),
        (326, 327), (327, 420), (420, 4), (4, 275), (275, 294),
    ],
};

/// Face contour
#[rustfmt::skip]
pub const FACE_OVAL: FeatureTable = FeatureTable {
    name: "face_oval",
    connections: &[
        (10, 338), (338, 297), (297, 332), (332, 284), (284, 251),
        (251, 389), (389, 356), (356, 454), (454, 323), (323, 361),
        (361, 288), (288, 397), (397, 365), (365, 379), (379, 378),
        (378, 400), (400, 377), (377, 152), (152, 148), (148, 176),
        (176, 149), (149, 150), (150, 136), (136, 172), (172, 58),
        (58, 132), (132, 93), (93, 234), (234, 127), (127, 162),
        (162, 21), (21, 54), (54, 103), (103, 67), (67, 109),
        (109, 10),
    ],
};

/// Tables in drawing order
pub const ALL_FEATURES: [FeatureTable; 4] = [EYES, MOUTH, NOSE, FACE_OVAL];
