/**
 * This module contains all logic for loading bundled assets: the catalog
 * images mapped onto artifact faces and the icon textures of the selector.
 */
pub mod pick;
pub mod texture;
