//! Skeleton pose boundary.
//!
//! Timelines address bones and slots by index and only need read/write access to the
//! local pose fields. Hosts with their own rig representation implement
//! [`SkeletonPose`]; [`Skeleton`] is a plain in-memory rig with a setup pose that is
//! used by tests and simple integrations.

use serde::{Deserialize, Serialize};

/// Indexed access to the animatable fields of a rig.
///
/// Indices come from the timelines and are assumed valid for the rig the animation
/// was authored against; implementations may panic on out-of-range indices.
pub trait SkeletonPose {
    /// Local rotation in degrees.
    fn bone_rotation(&self, bone: usize) -> f32;
    fn set_bone_rotation(&mut self, bone: usize, degrees: f32);

    fn bone_translation(&self, bone: usize) -> [f32; 2];
    fn set_bone_translation(&mut self, bone: usize, xy: [f32; 2]);

    fn bone_scale(&self, bone: usize) -> [f32; 2];
    fn set_bone_scale(&mut self, bone: usize, xy: [f32; 2]);

    /// RGBA in [0, 1].
    fn slot_color(&self, slot: usize) -> [f32; 4];
    fn set_slot_color(&mut self, slot: usize, rgba: [f32; 4]);

    fn slot_attachment(&self, slot: usize) -> Option<&str>;
    /// `None` clears the slot.
    fn set_slot_attachment(&mut self, slot: usize, name: Option<&str>);
}

/// Setup pose of a bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneData {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "one")]
    pub scale_x: f32,
    #[serde(default = "one")]
    pub scale_y: f32,
}

fn one() -> f32 {
    1.0
}

fn white() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl BoneData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Setup pose of a slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotData {
    pub name: String,
    pub bone: usize,
    #[serde(default = "white")]
    pub color: [f32; 4],
    #[serde(default)]
    pub attachment: Option<String>,
}

impl SlotData {
    pub fn new(name: impl Into<String>, bone: usize) -> Self {
        Self {
            name: name.into(),
            bone,
            color: white(),
            attachment: None,
        }
    }
}

/// Rig definition: bones (parents before children) and draw-ordered slots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonData {
    pub bones: Vec<BoneData>,
    #[serde(default)]
    pub slots: Vec<SlotData>,
}

/// Live local pose of a bone.
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub rotation: f32,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Bone {
    fn from_setup(data: &BoneData) -> Self {
        Self {
            rotation: data.rotation,
            x: data.x,
            y: data.y,
            scale_x: data.scale_x,
            scale_y: data.scale_y,
        }
    }
}

/// Live state of a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub color: [f32; 4],
    pub attachment: Option<String>,
}

impl Slot {
    fn from_setup(data: &SlotData) -> Self {
        Self {
            color: data.color,
            attachment: data.attachment.clone(),
        }
    }
}

/// In-memory rig: setup data plus the live pose timelines write into.
#[derive(Clone, Debug)]
pub struct Skeleton {
    data: SkeletonData,
    pub bones: Vec<Bone>,
    pub slots: Vec<Slot>,
}

impl Skeleton {
    /// Build a skeleton in its setup pose.
    pub fn new(data: SkeletonData) -> Self {
        let bones = data.bones.iter().map(Bone::from_setup).collect();
        let slots = data.slots.iter().map(Slot::from_setup).collect();
        Self { data, bones, slots }
    }

    pub fn data(&self) -> &SkeletonData {
        &self.data
    }

    pub fn set_to_setup_pose(&mut self) {
        self.set_bones_to_setup_pose();
        self.set_slots_to_setup_pose();
    }

    pub fn set_bones_to_setup_pose(&mut self) {
        for (bone, data) in self.bones.iter_mut().zip(&self.data.bones) {
            *bone = Bone::from_setup(data);
        }
    }

    pub fn set_slots_to_setup_pose(&mut self) {
        for (slot, data) in self.slots.iter_mut().zip(&self.data.slots) {
            // Reuse the existing allocation when the name is unchanged.
            slot.color = data.color;
            if slot.attachment != data.attachment {
                slot.attachment = data.attachment.clone();
            }
        }
    }

    pub fn find_bone(&self, name: &str) -> Option<usize> {
        let found = self.data.bones.iter().position(|b| b.name == name);
        if found.is_none() {
            log::warn!("skeleton: no bone named '{name}'");
        }
        found
    }

    pub fn find_slot(&self, name: &str) -> Option<usize> {
        let found = self.data.slots.iter().position(|s| s.name == name);
        if found.is_none() {
            log::warn!("skeleton: no slot named '{name}'");
        }
        found
    }
}

impl SkeletonPose for Skeleton {
    #[inline]
    fn bone_rotation(&self, bone: usize) -> f32 {
        self.bones[bone].rotation
    }

    #[inline]
    fn set_bone_rotation(&mut self, bone: usize, degrees: f32) {
        self.bones[bone].rotation = degrees;
    }

    #[inline]
    fn bone_translation(&self, bone: usize) -> [f32; 2] {
        let b = &self.bones[bone];
        [b.x, b.y]
    }

    #[inline]
    fn set_bone_translation(&mut self, bone: usize, xy: [f32; 2]) {
        let b = &mut self.bones[bone];
        b.x = xy[0];
        b.y = xy[1];
    }

    #[inline]
    fn bone_scale(&self, bone: usize) -> [f32; 2] {
        let b = &self.bones[bone];
        [b.scale_x, b.scale_y]
    }

    #[inline]
    fn set_bone_scale(&mut self, bone: usize, xy: [f32; 2]) {
        let b = &mut self.bones[bone];
        b.scale_x = xy[0];
        b.scale_y = xy[1];
    }

    #[inline]
    fn slot_color(&self, slot: usize) -> [f32; 4] {
        self.slots[slot].color
    }

    #[inline]
    fn set_slot_color(&mut self, slot: usize, rgba: [f32; 4]) {
        self.slots[slot].color = rgba;
    }

    fn slot_attachment(&self, slot: usize) -> Option<&str> {
        self.slots[slot].attachment.as_deref()
    }

    fn set_slot_attachment(&mut self, slot: usize, name: Option<&str>) {
        let current = &mut self.slots[slot].attachment;
        if current.as_deref() != name {
            *current = name.map(str::to_owned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> Skeleton {
        let mut root = BoneData::new("root");
        root.rotation = 15.0;
        let mut head = BoneData::new("head");
        head.parent = Some(0);
        head.y = 4.0;
        let mut slot = SlotData::new("face", 1);
        slot.attachment = Some("smile".into());
        Skeleton::new(SkeletonData {
            bones: vec![root, head],
            slots: vec![slot],
        })
    }

    #[test]
    fn starts_in_setup_pose_and_resets() {
        let mut sk = rig();
        assert_eq!(sk.bone_rotation(0), 15.0);
        assert_eq!(sk.bone_translation(1), [0.0, 4.0]);
        assert_eq!(sk.bone_scale(1), [1.0, 1.0]);
        assert_eq!(sk.slot_attachment(0), Some("smile"));

        sk.set_bone_rotation(0, 90.0);
        sk.set_bone_scale(1, [2.0, 3.0]);
        sk.set_slot_color(0, [0.0, 0.0, 0.0, 0.5]);
        sk.set_slot_attachment(0, None);
        sk.set_to_setup_pose();

        assert_eq!(sk.bone_rotation(0), 15.0);
        assert_eq!(sk.bone_scale(1), [1.0, 1.0]);
        assert_eq!(sk.slot_color(0), [1.0; 4]);
        assert_eq!(sk.slot_attachment(0), Some("smile"));
    }

    #[test]
    fn finds_by_name() {
        let sk = rig();
        assert_eq!(sk.find_bone("head"), Some(1));
        assert_eq!(sk.find_slot("face"), Some(0));
        assert_eq!(sk.find_bone("tail"), None);
    }

    #[test]
    fn setup_json_defaults() {
        let data: SkeletonData = serde_json::from_str(
            r#"{ "bones": [{ "name": "root" }], "slots": [{ "name": "body", "bone": 0 }] }"#,
        )
        .unwrap();
        assert_eq!(data.bones[0], BoneData::new("root"));
        assert_eq!(data.slots[0], SlotData::new("body", 0));
    }
}
