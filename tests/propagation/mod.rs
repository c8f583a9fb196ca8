mod hovering;
